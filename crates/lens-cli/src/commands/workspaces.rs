//! Workspace commands
//!
//! `lens workspaces list` shows the server workspaces. `lens workspace`
//! operates on the local mirror of one workspace under the configured
//! workspaces root: list it with sync status, follow changes on disk,
//! delete an entry, or pull a remote entry.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use lens_api::{LensClient, Params};
use lens_core::domain::file_entry::FileEntry;
use lens_core::domain::workspace::{WorkspaceDescriptor, WorkspaceKind};
use lens_core::ports::IWorkspaceObserver;
use lens_sync::watcher::WorkspaceWatcher;
use lens_sync::workspace::WorkspaceModel;
use lens_sync::SyncError;
use tracing::info;

use crate::context::{api_error, AppContext};
use crate::output::{get_formatter, print_entries, OutputFormat};

#[derive(Debug, Subcommand)]
pub enum WorkspacesCommand {
    /// List the workspaces visible to the logged-in user
    List,
}

impl WorkspacesCommand {
    pub async fn execute(&self, ctx: AppContext, format: OutputFormat) -> Result<()> {
        let fmt = get_formatter(format);
        let mut client = ctx.client();
        let workspaces = client
            .get_workspaces(Params::new())
            .await
            .map_err(|e| api_error(e, "list workspaces"))?;

        if format == OutputFormat::Json {
            fmt.print_json(&serde_json::to_value(&workspaces)?);
            return Ok(());
        }

        fmt.success(&format!("{} workspace(s)", workspaces.len()));
        for workspace in &workspaces {
            let access = if workspace.open { "open" } else { "private" };
            fmt.info(&format!("{:<32} {:<8} {}", workspace.name, access, workspace.id));
        }
        Ok(())
    }
}

/// Selects a workspace and a folder inside it
#[derive(Debug, Args)]
pub struct WorkspaceTarget {
    /// Workspace name
    pub name: String,

    /// Folder below the workspace root, e.g. `assemblies/gearbox`
    #[arg(long)]
    pub folder: Option<PathBuf>,

    /// Treat the workspace as local only, with no server comparison
    #[arg(long)]
    pub local: bool,

    /// Local root directory; defaults to `<workspaces.root>/<name>`
    #[arg(long)]
    pub path: Option<PathBuf>,
}

impl WorkspaceTarget {
    fn descriptor(&self, ctx: &AppContext) -> WorkspaceDescriptor {
        let url = self
            .path
            .clone()
            .unwrap_or_else(|| ctx.config.workspaces.root.join(&self.name));
        let kind = if self.local {
            WorkspaceKind::Local
        } else {
            WorkspaceKind::Server
        };
        WorkspaceDescriptor {
            name: self.name.clone(),
            url,
            kind,
            remote_id: None,
        }
    }

    /// Builds the model, refreshes it and descends into `--folder`
    async fn open(&self, ctx: &AppContext) -> Result<WorkspaceModel<LensClient>> {
        let descriptor = self.descriptor(ctx);
        let provider = (descriptor.kind == WorkspaceKind::Server).then(|| ctx.client());
        let mut model = WorkspaceModel::from_descriptor(&descriptor, ctx.config.workspaces.clone(), provider)?
            .context("External workspaces are not managed by this client")?;

        model.refresh().await.map_err(sync_error)?;
        if let Some(folder) = &self.folder {
            for name in folder_components(folder)? {
                model.open_folder(&name).await.map_err(sync_error)?;
            }
        }
        Ok(model)
    }
}

#[derive(Debug, Subcommand)]
pub enum WorkspaceCommand {
    /// List a workspace folder with its sync status
    Ls(WorkspaceTarget),
    /// Keep listing a workspace folder as it changes on disk
    Watch(WorkspaceTarget),
    /// Delete an entry on the server and locally
    Delete {
        #[command(flatten)]
        target: WorkspaceTarget,
        /// Entry name in the selected folder
        entry: String,
    },
    /// Download a server entry into the workspace
    Pull {
        #[command(flatten)]
        target: WorkspaceTarget,
        /// Entry name in the selected folder
        entry: String,
    },
}

impl WorkspaceCommand {
    pub async fn execute(&self, ctx: AppContext, format: OutputFormat) -> Result<()> {
        let fmt = get_formatter(format);
        match self {
            WorkspaceCommand::Ls(target) => {
                let model = target.open(&ctx).await?;
                print_entries(&*fmt, format, &heading(&model), model.entries());
                Ok(())
            }
            WorkspaceCommand::Watch(target) => self.execute_watch(&ctx, target, format).await,
            WorkspaceCommand::Delete { target, entry } => {
                let mut model = target.open(&ctx).await?;
                model.delete_entry(entry).await.map_err(sync_error)?;
                fmt.success(&format!("Deleted {entry}"));
                print_entries(&*fmt, format, &heading(&model), model.entries());
                Ok(())
            }
            WorkspaceCommand::Pull { target, entry } => {
                let mut model = target.open(&ctx).await?;
                let path = model.download_entry(entry).await.map_err(sync_error)?;
                fmt.success(&format!("Downloaded {}", path.display()));
                Ok(())
            }
        }
    }

    async fn execute_watch(
        &self,
        ctx: &AppContext,
        target: &WorkspaceTarget,
        format: OutputFormat,
    ) -> Result<()> {
        let mut model = target.open(ctx).await?;
        let full_path = model.full_path();
        let observer = Arc::new(PrintingObserver {
            format,
            heading: heading(&model),
        });
        observer.on_reset(model.entries());
        model.set_observer(observer);

        let (mut watcher, events) = WorkspaceWatcher::new()?;
        watcher.watch(&full_path)?;
        info!(path = %full_path.display(), "Watching for changes, Ctrl-C to stop");

        tokio::select! {
            _ = model.follow(events) => {}
            result = tokio::signal::ctrl_c() => {
                result.context("Failed to listen for Ctrl-C")?;
            }
        }
        watcher.unwatch(&full_path)?;
        Ok(())
    }
}

/// Prints every rebuilt listing
struct PrintingObserver {
    format: OutputFormat,
    heading: String,
}

impl IWorkspaceObserver for PrintingObserver {
    fn on_reset(&self, entries: &[FileEntry]) {
        let fmt = get_formatter(self.format);
        print_entries(&*fmt, self.format, &self.heading, entries);
    }
}

fn heading(model: &WorkspaceModel<LensClient>) -> String {
    model.workspace_path().display().to_string()
}

/// Splits `--folder` into names, rejecting anything that leaves the
/// workspace
fn folder_components(folder: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for component in folder.components() {
        match component {
            Component::Normal(name) => names.push(name.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => bail!("Folder must be relative to the workspace: {}", folder.display()),
        }
    }
    Ok(names)
}

/// Surfaces API failures inside sync errors with the same hints as direct
/// calls
fn sync_error(err: SyncError) -> anyhow::Error {
    match err {
        SyncError::Lens(e) => api_error(e, "synchronize workspace"),
        other => anyhow::Error::new(other),
    }
}
