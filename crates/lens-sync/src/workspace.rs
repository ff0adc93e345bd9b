//! Workspace model
//!
//! A [`WorkspaceModel`] owns the entry list of one directory level of a
//! workspace and rebuilds it on every [`refresh`](WorkspaceModel::refresh).
//! Server workspaces classify entries against the user's remote models;
//! local workspaces list folders and openable files as untracked.
//!
//! The model navigates with a sub-path cursor below the workspace root.
//! Observers see only full resets.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use lens_core::config::WorkspacesConfig;
use lens_core::domain::file_entry::FileEntry;
use lens_core::domain::workspace::{WorkspaceDescriptor, WorkspaceKind};
use lens_core::ports::{ILensProvider, IWorkspaceObserver};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::filesystem::scan_local;
use crate::reconcile::reconcile;
use crate::watcher::ChangeEvent;
use crate::SyncError;

/// Where a workspace gets its remote state from
enum Backend<P> {
    Local,
    Server(P),
}

/// One workspace and its current listing
pub struct WorkspaceModel<P> {
    name: String,
    root: PathBuf,
    remote_id: Option<String>,
    sub_path: PathBuf,
    entries: Vec<FileEntry>,
    config: WorkspacesConfig,
    backend: Backend<P>,
    observer: Option<Arc<dyn IWorkspaceObserver>>,
}

impl<P: ILensProvider> WorkspaceModel<P> {
    /// Builds the model for a stored workspace descriptor
    ///
    /// Returns `Ok(None)` for external workspaces, which this client does
    /// not list. The entry list starts empty; call
    /// [`refresh`](Self::refresh) to populate it.
    ///
    /// # Errors
    /// [`SyncError::MissingProvider`] for a server workspace without a
    /// provider.
    pub fn from_descriptor(
        descriptor: &WorkspaceDescriptor,
        config: WorkspacesConfig,
        provider: Option<P>,
    ) -> Result<Option<Self>, SyncError> {
        let backend = match (descriptor.kind, provider) {
            (WorkspaceKind::External, _) => return Ok(None),
            (WorkspaceKind::Local, _) => Backend::Local,
            (WorkspaceKind::Server, Some(provider)) => Backend::Server(provider),
            (WorkspaceKind::Server, None) => {
                return Err(SyncError::MissingProvider(descriptor.name.clone()))
            }
        };

        Ok(Some(Self {
            name: descriptor.name.clone(),
            root: descriptor.url.clone(),
            remote_id: descriptor.remote_id.clone(),
            sub_path: PathBuf::new(),
            entries: Vec::new(),
            config,
            backend,
            observer: None,
        }))
    }

    /// Registers the observer told about every rebuilt listing
    pub fn set_observer(&mut self, observer: Arc<dyn IWorkspaceObserver>) {
        self.observer = Some(observer);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> WorkspaceKind {
        match self.backend {
            Backend::Local => WorkspaceKind::Local,
            Backend::Server(_) => WorkspaceKind::Server,
        }
    }

    /// Identifier of the server workspace, if known
    pub fn remote_id(&self) -> Option<&str> {
        self.remote_id.as_deref()
    }

    /// The current listing, in display order
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Looks up an entry of the current listing by name
    ///
    /// Folders are never matched against remote models, so a folder and a
    /// remote model may share a name. File entries take precedence here;
    /// [`open_folder`](Self::open_folder) looks at folders only.
    pub fn entry(&self, name: &str) -> Option<&FileEntry> {
        self.entries
            .iter()
            .find(|e| e.name == name && !e.is_folder)
            .or_else(|| self.folder(name))
    }

    fn folder(&self, name: &str) -> Option<&FileEntry> {
        self.entries.iter().find(|e| e.name == name && e.is_folder)
    }

    /// The provider backing a server workspace
    pub fn provider_mut(&mut self) -> Option<&mut P> {
        match &mut self.backend {
            Backend::Server(provider) => Some(provider),
            Backend::Local => None,
        }
    }

    /// Cursor below the workspace root; empty at the root
    pub fn sub_path(&self) -> &Path {
        &self.sub_path
    }

    /// Display path: the workspace name, followed by the sub-path if any
    pub fn workspace_path(&self) -> PathBuf {
        Path::new(&self.name).join(&self.sub_path)
    }

    /// Local directory currently listed
    pub fn full_path(&self) -> PathBuf {
        self.root.join(&self.sub_path)
    }

    /// Rebuilds the listing of the current directory
    ///
    /// The directory is created if missing. On failure the previous
    /// listing is kept and observers are not notified.
    #[instrument(skip(self), fields(workspace = %self.name))]
    pub async fn refresh(&mut self) -> Result<(), SyncError> {
        let full_path = self.full_path();
        let entries = match &mut self.backend {
            Backend::Local => scan_local(&full_path, &self.config)
                .await?
                .into_untracked(&self.config),
            Backend::Server(provider) => {
                let models = provider.get_models().await?;
                let local = scan_local(&full_path, &self.config).await?;
                reconcile(models, &local, &self.config, &full_path)
            }
        };

        debug!(entries = entries.len(), "Workspace listing rebuilt");
        self.entries = entries;
        if let Some(observer) = &self.observer {
            observer.on_reset(&self.entries);
        }
        Ok(())
    }

    /// Descends into a folder of the current listing
    pub async fn open_folder(&mut self, name: &str) -> Result<(), SyncError> {
        if self.folder(name).is_none() {
            return Err(match self.entry(name) {
                Some(_) => SyncError::NotAFolder(name.to_string()),
                None => SyncError::UnknownEntry(name.to_string()),
            });
        }
        self.sub_path.push(name);
        info!(workspace = %self.name, sub_path = %self.sub_path.display(), "Opened folder");
        self.refresh().await
    }

    /// Moves the cursor one level up; at the root this only refreshes
    pub async fn open_parent_folder(&mut self) -> Result<(), SyncError> {
        self.sub_path.pop();
        self.refresh().await
    }

    /// Deletes an entry remotely and locally, then refreshes
    ///
    /// The linked remote model is deleted first; if that fails nothing is
    /// removed locally. Folder entries are removed recursively; a file entry
    /// never removes a directory that happens to sit at its path. An entry
    /// with no local copy only needs the remote delete.
    #[instrument(skip(self), fields(workspace = %self.name))]
    pub async fn delete_entry(&mut self, name: &str) -> Result<(), SyncError> {
        let entry = self
            .entry(name)
            .cloned()
            .ok_or_else(|| SyncError::UnknownEntry(name.to_string()))?;

        if let (Some(model_id), Backend::Server(provider)) = (entry.remote_id(), &mut self.backend) {
            provider.delete_model(model_id).await?;
            info!(model_id, "Deleted remote model");
        }

        match tokio::fs::metadata(&entry.path).await {
            Ok(metadata) if metadata.is_dir() && entry.is_folder => {
                tokio::fs::remove_dir_all(&entry.path).await?
            }
            Ok(metadata) if metadata.is_dir() => {
                debug!(path = %entry.path.display(), "Local path is a folder, keeping it");
            }
            Ok(_) => tokio::fs::remove_file(&entry.path).await?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %entry.path.display(), "No local copy to delete");
            }
            Err(e) => return Err(e.into()),
        }

        self.refresh().await
    }

    /// Downloads a remote entry to its local path, then refreshes
    ///
    /// The local mtime is set to the remote `updatedAt`, so the next
    /// refresh classifies the file as synced.
    #[instrument(skip(self), fields(workspace = %self.name))]
    pub async fn download_entry(&mut self, name: &str) -> Result<PathBuf, SyncError> {
        let entry = self
            .entry(name)
            .cloned()
            .ok_or_else(|| SyncError::UnknownEntry(name.to_string()))?;
        let (Some(model), Backend::Server(provider)) = (entry.remote.as_ref(), &mut self.backend)
        else {
            return Err(SyncError::NotTracked(name.to_string()));
        };

        provider
            .download_file(&model.unique_file_name, &entry.path)
            .await?;
        set_modified_ms(entry.path.clone(), model.updated_at).await?;
        info!(path = %entry.path.display(), "Downloaded workspace entry");

        self.refresh().await?;
        Ok(entry.path)
    }

    /// Refreshes once per change event until the channel closes
    ///
    /// A failed refresh is logged and does not stop the loop.
    pub async fn follow(&mut self, mut events: mpsc::Receiver<ChangeEvent>) {
        while let Some(event) = events.recv().await {
            debug!(event = ?event, "Workspace changed on disk");
            if let Err(e) = self.refresh().await {
                warn!(workspace = %self.name, error = %e, "Refresh after change failed");
            }
        }
    }
}

/// Sets a file's mtime to an epoch-millisecond timestamp
async fn set_modified_ms(path: PathBuf, epoch_ms: i64) -> Result<(), SyncError> {
    let mtime = system_time_from_ms(epoch_ms);
    tokio::task::spawn_blocking(move || {
        std::fs::File::options()
            .write(true)
            .open(&path)?
            .set_modified(mtime)
    })
    .await
    .map_err(std::io::Error::other)??;
    Ok(())
}

fn system_time_from_ms(epoch_ms: i64) -> SystemTime {
    let offset = Duration::from_millis(epoch_ms.unsigned_abs());
    if epoch_ms >= 0 {
        UNIX_EPOCH + offset
    } else {
        UNIX_EPOCH - offset
    }
}
