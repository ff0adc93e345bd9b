//! Local directory scan
//!
//! Lists one directory level of a workspace. Folders are always listed;
//! files are listed with their local timestamps so they can be matched
//! against remote models. Only openable files ever become standalone
//! entries, see [`LocalListing::openable_files`].

use std::collections::HashMap;
use std::fs::Metadata;
use std::path::Path;

use chrono::{DateTime, Utc};
use lens_core::config::WorkspacesConfig;
use lens_core::domain::file_entry::FileEntry;
use tracing::{debug, instrument};

use crate::SyncError;

/// One scanned directory level
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalListing {
    /// Sub-folders, sorted by name
    pub folders: Vec<FileEntry>,
    /// Regular files, sorted by name
    pub files: Vec<FileEntry>,
}

impl LocalListing {
    /// Files that pass the openable allow-list, in name order
    pub fn openable_files<'a>(
        &'a self,
        config: &'a WorkspacesConfig,
    ) -> impl Iterator<Item = &'a FileEntry> + 'a {
        self.files.iter().filter(|f| config.is_openable(&f.name))
    }

    /// Files keyed by name, for matching remote records
    pub fn files_by_name(&self) -> HashMap<&str, &FileEntry> {
        self.files.iter().map(|f| (f.name.as_str(), f)).collect()
    }

    /// Folders followed by openable files, all untracked
    pub fn into_untracked(self, config: &WorkspacesConfig) -> Vec<FileEntry> {
        let LocalListing { mut folders, files } = self;
        folders.extend(files.into_iter().filter(|f| config.is_openable(&f.name)));
        folders
    }
}

/// Scans `dir`, creating it first if it does not exist
///
/// Entries whose type cannot be read, and anything that is neither a
/// directory nor a regular file, are skipped.
#[instrument(skip(dir, config), fields(dir = %dir.display()))]
pub async fn scan_local(dir: &Path, config: &WorkspacesConfig) -> Result<LocalListing, SyncError> {
    if !tokio::fs::try_exists(dir).await? {
        debug!("creating missing workspace directory");
    }
    tokio::fs::create_dir_all(dir).await?;

    let mut listing = LocalListing::default();
    let mut read_dir = tokio::fs::read_dir(dir).await?;
    while let Some(item) = read_dir.next_entry().await? {
        let name = item.file_name().to_string_lossy().into_owned();
        let path = item.path();
        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!(name = %name, error = %e, "skipping unreadable entry");
                continue;
            }
        };

        if metadata.is_dir() {
            listing.folders.push(FileEntry::folder(name, path));
        } else if metadata.is_file() {
            let (created, modified) = timestamps(&metadata);
            listing
                .files
                .push(FileEntry::local_file(name, path, created, modified));
        }
    }

    listing.folders.sort_by(|a, b| a.name.cmp(&b.name));
    listing.files.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(
        folders = listing.folders.len(),
        files = listing.files.len(),
        "scan complete"
    );
    Ok(listing)
}

/// Creation and modification times, when the platform reports them
fn timestamps(metadata: &Metadata) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let created = metadata.created().ok().map(DateTime::<Utc>::from);
    let modified = metadata.modified().ok().map(DateTime::<Utc>::from);
    (created, modified)
}
