//! Local file entries
//!
//! A [`FileEntry`] is one row of a workspace listing: a local folder, a local
//! file, or a remote model with its expected local path. Entries are rebuilt
//! from scratch on every refresh.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::records::Model;

/// Relationship between a local file and its remote counterpart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyncStatus {
    /// Not tracked on the server (local workspaces, folders)
    #[default]
    Untracked,
    /// Local and remote copies have the same timestamp
    Synced,
    /// The local copy is newer, or exists only locally
    ToUpload,
    /// The remote copy is newer, or exists only remotely
    ToDownload,
}

impl SyncStatus {
    /// Returns true if the entry needs a transfer in either direction
    pub fn needs_transfer(&self) -> bool {
        matches!(self, SyncStatus::ToUpload | SyncStatus::ToDownload)
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyncStatus::Untracked => "Untracked",
            SyncStatus::Synced => "Synced",
            SyncStatus::ToUpload => "ToUpload",
            SyncStatus::ToDownload => "ToDownload",
        };
        write!(f, "{}", s)
    }
}

/// One row of a workspace listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Base name of the file or folder
    pub name: String,
    /// Absolute local path (may not exist for `ToDownload` entries)
    pub path: PathBuf,
    pub is_folder: bool,
    pub status: SyncStatus,
    /// Linked remote model, when the entry is tracked on the server
    pub remote: Option<Model>,
    /// Local creation time, when the file exists locally
    pub created_at: Option<DateTime<Utc>>,
    /// Local modification time, when the file exists locally
    pub modified_at: Option<DateTime<Utc>>,
}

impl FileEntry {
    /// A local folder. Folders are never versioned, so they stay untracked.
    pub fn folder(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            is_folder: true,
            status: SyncStatus::Untracked,
            remote: None,
            created_at: None,
            modified_at: None,
        }
    }

    /// A local file with no remote counterpart yet
    pub fn local_file(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        created_at: Option<DateTime<Utc>>,
        modified_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            is_folder: false,
            status: SyncStatus::Untracked,
            remote: None,
            created_at,
            modified_at,
        }
    }

    /// A remote model mapped onto its expected local path
    pub fn remote(
        model: Model,
        path: impl Into<PathBuf>,
        status: SyncStatus,
        modified_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            name: model.cust_file_name.clone(),
            path: path.into(),
            is_folder: false,
            status,
            remote: Some(model),
            created_at: None,
            modified_at,
        }
    }

    /// Sets the synchronization status
    pub fn with_status(mut self, status: SyncStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_created_at(mut self, created_at: Option<DateTime<Utc>>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Identifier of the linked remote model, if any
    pub fn remote_id(&self) -> Option<&str> {
        self.remote.as_ref().map(|m| m.id.as_str())
    }
}
