//! Workspace observer port
//!
//! Bound UI views are told about listing changes through a full reset only;
//! there are no incremental row updates.

use crate::domain::file_entry::FileEntry;

/// Receives the rebuilt entry list after every refresh
pub trait IWorkspaceObserver: Send + Sync {
    /// Called with the complete, ordered entry list
    fn on_reset(&self, entries: &[FileEntry]);
}
