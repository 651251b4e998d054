//! `sidebar build` command implementation.

use std::path::PathBuf;

use clap::Args;
use sidebar_tree::build_sidebar;

use super::{SourceArgs, to_json, write_json};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Output file for the sidebar JSON (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON.
    #[arg(long)]
    pretty: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let (config, options) = self.source.load()?;

        output.info(&format!(
            "Source: {}",
            config.docs_resolved.source_dir.display()
        ));

        let sidebar = build_sidebar(&options)?;
        write_json(&to_json(&sidebar, self.pretty)?, self.output.as_deref())?;

        if let Some(path) = &self.output {
            output.success(&format!(
                "Sidebar with {} groups written to {}",
                sidebar.group_count(),
                path.display()
            ));
        }
        Ok(())
    }
}
