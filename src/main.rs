//! Hoist CLI - deploy workspace files to remote targets
//!
//! Usage: hoist [--root <DIR>]... <COMMAND>
//!
//! Commands:
//!   packages     List configured packages
//!   targets      List configured targets
//!   deploy       Deploy a package
//!   deploy-file  Deploy a single file
//!   pull         Download a package
//!   pull-file    Download a single file
//!   delete       Delete a package on its targets
//!   delete-file  Delete a single file on a target
//!   list         List a target directory
//!   watch        Deploy on change until Ctrl+C

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::Output;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let workspaces = commands::workspaces::open(&cli.roots, cli.yes).await?;
    let out = Output::new(cli.json);

    let result = match cli.command {
        Commands::Packages => commands::listing::cmd_packages(&workspaces, &out),
        Commands::Targets => commands::listing::cmd_targets(&workspaces, &out),
        Commands::Deploy { package } => {
            commands::transfer::cmd_deploy(&workspaces, &package, &out).await
        }
        Commands::DeployFile { file, target } => {
            commands::transfer::cmd_deploy_file(&workspaces, &file, &target, &out).await
        }
        Commands::Pull { package } => commands::transfer::cmd_pull(&workspaces, &package, &out).await,
        Commands::PullFile { file, target } => {
            commands::transfer::cmd_pull_file(&workspaces, &file, &target, &out).await
        }
        Commands::Delete { package, no_ask } => {
            commands::transfer::cmd_delete(&workspaces, &package, !no_ask, &out).await
        }
        Commands::DeleteFile {
            file,
            target,
            no_ask,
        } => commands::transfer::cmd_delete_file(&workspaces, &file, &target, !no_ask, &out).await,
        Commands::List { target, dir } => {
            commands::listing::cmd_list(&workspaces, &target, &dir, &out).await
        }
        Commands::Watch => commands::watch::cmd_watch(&workspaces, &out).await,
    };

    for workspace in &workspaces {
        workspace.dispose();
    }
    result
}

/// Log to stderr; `HOIST_LOG` overrides the `-v` derived level
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_env("HOIST_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("hoist={level}")));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
