//! Sidebar CLI - directory-tree to navigation sidebar compiler.
//!
//! Provides commands for:
//! - `build`: Build the sidebar once and write it as JSON
//! - `inject`: Write the sidebar into a site configuration document
//! - `watch`: Rebuild the sidebar on structural changes

mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, InjectArgs, WatchArgs};
use output::Output;

/// Sidebar - navigation sidebar generator for documentation sites.
#[derive(Parser)]
#[command(name = "sidebar", version, about)]
struct Cli {
    /// Enable verbose output (info-level logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the sidebar once.
    Build(BuildArgs),
    /// Inject the sidebar into a site configuration JSON document.
    Inject(InjectArgs),
    /// Build, then rebuild whenever files or directories are added or removed.
    Watch(WatchArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Inject(args) => args.execute(),
        Commands::Watch(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
