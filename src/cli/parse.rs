//! CLI parse: clap types for shellmenu. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// shellmenu - install a declarative context-menu tree into the registry
#[derive(Parser, Debug)]
#[command(name = "shellmenu")]
#[command(about = "Synchronize a declarative context-menu tree into the registry")]
pub struct Cli {
    /// Command to run (default: install)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Workspace directory: searched first for the manifest and shellmenu.toml
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Manifest file path (skips the manifest search)
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// The requested command, `install` when none was given.
    pub fn command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Install { dry_run: false })
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Erase and recreate every menu entry named in the manifest
    Install {
        /// Show the keys that would be written without touching the store
        #[arg(long)]
        dry_run: bool,
    },
    /// Erase every menu entry named in the manifest
    Remove,
}
