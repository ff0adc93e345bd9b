//! Lens Sync - Workspace synchronization model
//!
//! Provides:
//! - Local directory scanning filtered by the openable allow-list
//! - Reconciliation of remote models against local files
//! - Server and local workspace models with folder navigation
//! - Filesystem watching that drives refreshes
//!
//! ## Modules
//!
//! - [`filesystem`] - Local directory scan
//! - [`reconcile`] - Pure remote/local status classification
//! - [`workspace`] - Workspace model owning the entry list
//! - [`watcher`] - `notify` watcher feeding a change channel

pub mod filesystem;
pub mod reconcile;
pub mod watcher;
pub mod workspace;

use lens_core::domain::errors::LensError;
use thiserror::Error;

/// Errors that can occur while maintaining a workspace
#[derive(Debug, Error)]
pub enum SyncError {
    /// A remote call failed
    #[error(transparent)]
    Lens(#[from] LensError),

    /// An I/O error occurred on the local workspace directory
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The filesystem watcher could not be set up
    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    /// No entry with this name in the current listing
    #[error("No such entry: {0}")]
    UnknownEntry(String),

    /// The entry exists but is not a folder
    #[error("Not a folder: {0}")]
    NotAFolder(String),

    /// The entry has no remote counterpart to download
    #[error("Not tracked on the server: {0}")]
    NotTracked(String),

    /// A server workspace was created without a provider
    #[error("Server workspace {0} needs a Lens provider")]
    MissingProvider(String),
}
