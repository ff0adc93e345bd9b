//! Remote/local reconciliation
//!
//! Classifies every remote model against the file of the same name in the
//! current directory, then appends local files the server does not know.
//! Timestamps are compared in epoch milliseconds with no skew tolerance:
//! a remote `updatedAt` one millisecond newer than the local mtime is
//! already a download.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::Path;

use lens_core::config::WorkspacesConfig;
use lens_core::domain::file_entry::{FileEntry, SyncStatus};
use lens_core::domain::records::Model;

use crate::filesystem::LocalListing;

/// Builds the entry list of a server workspace directory
///
/// Order: folders by name, then remote models in server order, then
/// openable local-only files by name. Folders are never matched against
/// remote records. The result depends only on the inputs, so refreshing an
/// unchanged directory yields an identical list.
pub fn reconcile(
    models: Vec<Model>,
    local: &LocalListing,
    config: &WorkspacesConfig,
    full_path: &Path,
) -> Vec<FileEntry> {
    let local_files = local.files_by_name();
    let mut entries: Vec<FileEntry> = local.folders.clone();
    let mut matched: HashSet<String> = HashSet::new();

    for model in models {
        let path = full_path.join(&model.cust_file_name);
        let entry = match local_files.get(model.cust_file_name.as_str()) {
            Some(file) => {
                matched.insert(model.cust_file_name.clone());
                let status = compare(model.updated_at, file);
                FileEntry::remote(model, path, status, file.modified_at)
                    .with_created_at(file.created_at)
            }
            None => FileEntry::remote(model, path, SyncStatus::ToDownload, None),
        };
        entries.push(entry);
    }

    entries.extend(
        local
            .openable_files(config)
            .filter(|file| !matched.contains(&file.name))
            .map(|file| file.clone().with_status(SyncStatus::ToUpload)),
    );
    entries
}

/// Status of a remote model whose local copy exists
///
/// A local file without a readable mtime counts as older than any remote.
fn compare(remote_updated_at: i64, local: &FileEntry) -> SyncStatus {
    let local_ms = match local.modified_at {
        Some(modified) => modified.timestamp_millis(),
        None => return SyncStatus::ToDownload,
    };
    match remote_updated_at.cmp(&local_ms) {
        Ordering::Greater => SyncStatus::ToDownload,
        Ordering::Less => SyncStatus::ToUpload,
        Ordering::Equal => SyncStatus::Synced,
    }
}
