//! `sidebar watch` command implementation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use sidebar_tree::{BuildOptions, build_sidebar};
use sidebar_watch::{ChangeWatcher, FsWatcher};

use super::{SourceArgs, to_json, write_json};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the watch command.
#[derive(Args)]
pub(crate) struct WatchArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Output file for the sidebar JSON.
    #[arg(short, long)]
    output: PathBuf,

    /// Pretty-print the JSON.
    #[arg(long)]
    pretty: bool,
}

impl WatchArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let (config, options) = self.source.load()?;
        let source_dir = config.docs_resolved.source_dir.clone();

        // Initial build must succeed; later failures keep the last good file
        rebuild(&options, &self.output, self.pretty)?;
        output.success(&format!("Sidebar written to {}", self.output.display()));

        let watcher = FsWatcher::new(
            &source_dir,
            &config.watch_patterns(),
            Duration::from_millis(config.watch.debounce_ms),
        )?;
        let (events, _handle) = watcher.watch()?;

        output.info(&format!(
            "Watching {} for changes (Ctrl+C to stop)",
            source_dir.display()
        ));

        ChangeWatcher::new(|| rebuild(&options, &self.output, self.pretty)).run(&events);
        Ok(())
    }
}

/// Build from scratch and overwrite `path` only on success.
fn rebuild(options: &BuildOptions, path: &Path, pretty: bool) -> Result<(), CliError> {
    let sidebar = build_sidebar(options)?;
    write_json(&to_json(&sidebar, pretty)?, Some(path))
}
