//! `sidebar inject` command implementation.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use sidebar_tree::inject_sidebar;

use super::{SourceArgs, to_json, write_json};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the inject command.
#[derive(Args)]
pub(crate) struct InjectArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Site configuration JSON document to inject into.
    #[arg(long)]
    site: PathBuf,

    /// Output file for the updated document (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON.
    #[arg(long)]
    pretty: bool,
}

impl InjectArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let (_, options) = self.source.load()?;

        let site: serde_json::Value = serde_json::from_str(&fs::read_to_string(&self.site)?)?;
        let site = inject_sidebar(site, &options)?;
        write_json(&to_json(&site, self.pretty)?, self.output.as_deref())?;

        if let Some(path) = &self.output {
            output.success(&format!("Site config written to {}", path.display()));
        }
        Ok(())
    }
}
