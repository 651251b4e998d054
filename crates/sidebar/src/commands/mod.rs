//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod inject;
pub(crate) mod watch;

pub(crate) use build::BuildArgs;
pub(crate) use inject::InjectArgs;
pub(crate) use watch::WatchArgs;

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use console::Term;
use serde::Serialize;
use sidebar_config::{CliSettings, Config};
use sidebar_tree::BuildOptions;

use crate::error::CliError;

/// Arguments shared by every command that builds a sidebar.
#[derive(Args)]
pub(crate) struct SourceArgs {
    /// Path to configuration file (default: auto-discover sidebar.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Docs source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Mark generated groups as collapsed (overrides config).
    #[arg(long)]
    collapsed: bool,

    /// Drop index files as standalone items (overrides config).
    #[arg(long)]
    ignore_index_item: bool,
}

impl SourceArgs {
    /// Load configuration and compile build options.
    pub(crate) fn load(&self) -> Result<(Config, BuildOptions), CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir.clone(),
            collapsed: self.collapsed.then_some(true),
            ignore_index_item: self.ignore_index_item.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let options = BuildOptions::from_config(&config)?;
        Ok((config, options))
    }
}

/// Serialize `value` as JSON.
pub(crate) fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

/// Write JSON to `path`, or to stdout when no path is given.
pub(crate) fn write_json(json: &str, path: Option<&Path>) -> Result<(), CliError> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, format!("{json}\n"))?;
        }
        None => Term::stdout().write_line(json)?,
    }
    Ok(())
}
