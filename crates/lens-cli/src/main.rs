//! Lens CLI - Command-line interface for the Lens workbench client
//!
//! Provides commands for:
//! - Logging in and out of Lens
//! - Listing and synchronizing workspaces
//! - Uploading and downloading files
//! - Searching curated items and browsing the public gallery

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod context;
mod output;
mod session;

use commands::{
    auth::AuthCommand,
    discover::{GalleryCommand, SearchCommand},
    transfer::{DownloadCommand, UploadCommand},
    workspaces::{WorkspaceCommand, WorkspacesCommand},
};
use context::AppContext;
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "lens", version, about = "Command-line client for Lens")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log in, log out, or show the connection status
    #[command(subcommand)]
    Auth(AuthCommand),
    /// Server workspaces
    #[command(subcommand)]
    Workspaces(WorkspacesCommand),
    /// Work with the files of one workspace
    #[command(subcommand)]
    Workspace(WorkspaceCommand),
    /// Upload a local file
    Upload(UploadCommand),
    /// Download a stored file by its unique name
    Download(DownloadCommand),
    /// Search curated items by keyword
    Search(SearchCommand),
    /// List the public share-link gallery
    Gallery(GalleryCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = AppContext::load(cli.config.as_deref())?;

    let filter = match cli.verbose {
        0 => ctx.config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    match cli.command {
        Commands::Auth(cmd) => cmd.execute(ctx, format).await,
        Commands::Workspaces(cmd) => cmd.execute(ctx, format).await,
        Commands::Workspace(cmd) => cmd.execute(ctx, format).await,
        Commands::Upload(cmd) => cmd.execute(ctx, format).await,
        Commands::Download(cmd) => cmd.execute(ctx, format).await,
        Commands::Search(cmd) => cmd.execute(ctx, format).await,
        Commands::Gallery(cmd) => cmd.execute(ctx, format).await,
    }
}
