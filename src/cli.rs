use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Hoist - deploy workspace files to remote targets
#[derive(Parser, Debug)]
#[command(name = "hoist")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Workspace folder (repeat for multi-root)
    #[arg(short, long = "root", global = true, default_value = ".")]
    pub roots: Vec<PathBuf>,

    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Skip interactive prompts (auto-confirm local deletes)
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List configured packages
    Packages,

    /// List configured targets
    Targets,

    /// Deploy every file of a package to its targets
    Deploy {
        /// Package name
        package: String,
    },

    /// Deploy a single file
    DeployFile {
        file: PathBuf,

        /// Target name
        #[arg(short, long)]
        target: String,
    },

    /// Download every file of a package from its first target
    Pull {
        /// Package name
        package: String,
    },

    /// Download a single file
    PullFile {
        file: PathBuf,

        /// Target name
        #[arg(short, long)]
        target: String,
    },

    /// Delete every file of a package on its targets
    Delete {
        /// Package name
        package: String,

        /// Never offer to delete the local copies
        #[arg(long)]
        no_ask: bool,
    },

    /// Delete a single file on a target
    DeleteFile {
        file: PathBuf,

        /// Target name
        #[arg(short, long)]
        target: String,

        /// Never offer to delete the local copy
        #[arg(long)]
        no_ask: bool,
    },

    /// List a directory of a target
    List {
        /// Target name
        target: String,

        /// Directory relative to the target root
        #[arg(default_value = "")]
        dir: String,
    },

    /// Watch workspaces and deploy on change
    Watch,
}
