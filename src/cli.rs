//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `firemono`.
#[derive(Debug, Parser)]
#[command(name = "firemono", version, about = "Integrate firebase-init projects into a monorepo")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Integrate a firebase-init directory as a new project-graph entry.
    Integrate {
        /// Display name for the new project.
        name: String,
        /// Directory prepared by `firebase init` (must contain firebase.json).
        #[arg(long = "init-dir")]
        init_directory: PathBuf,
        /// Workspace-relative project directory (defaults to `apps/<name>`).
        #[arg(long)]
        directory: Option<String>,
        /// Comma-separated classification tags to prepend to the synthesized ones.
        #[arg(long)]
        tags: Option<String>,
        /// Monorepo workspace root.
        #[arg(long, default_value = ".")]
        workspace_root: PathBuf,
    },
    /// Print the Firebase features detected in an init directory.
    Detect {
        /// Directory prepared by `firebase init`.
        init_directory: PathBuf,
    },
}
