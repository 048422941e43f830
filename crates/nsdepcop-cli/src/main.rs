//! nsdepcop CLI tool.
//!
//! Usage:
//! ```bash
//! nsdepcop check [PATH] --deps deps.json [--format text|json|compact]
//! nsdepcop show-config [PATH]
//! nsdepcop init [--force]
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

/// Namespace and assembly dependency checker
#[derive(Parser)]
#[command(name = "nsdepcop")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check extracted dependencies against the project's rules
    Check {
        /// Project folder whose config applies (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// JSON file listing the type and assembly dependencies to check
        #[arg(short, long, env = "NSDEPCOP_DEPS")]
        deps: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the effective config for a project folder
    ShowConfig {
        /// Project folder (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Create a config file in the current directory
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for analysis results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-issue compact format.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check { path, deps, format } => commands::check::run(&path, &deps, format),
        Commands::ShowConfig { path } => commands::show_config::run(&path),
        Commands::Init { force } => commands::init::run(force),
    }
}
