//! Workspace directory watching
//!
//! Wraps a `notify` watcher and forwards relevant filesystem events through
//! a bounded Tokio channel. Every event is delivered; coalescing bursts is
//! left to the consumer.
//!
//! ```text
//! inotify / kqueue
//!       │
//!       ▼
//!  WorkspaceWatcher  ──→  mpsc::channel  ──→  WorkspaceModel::follow
//! ```

use std::path::{Path, PathBuf};

use notify::event::{ModifyKind, RenameMode};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::SyncError;

/// Capacity of the event channel
const CHANNEL_CAPACITY: usize = 256;

/// A filesystem change under a watched workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    Created(PathBuf),
    Modified(PathBuf),
    Removed(PathBuf),
    Renamed { from: PathBuf, to: PathBuf },
}

impl ChangeEvent {
    /// The affected path; the destination for renames
    pub fn path(&self) -> &Path {
        match self {
            ChangeEvent::Created(p) | ChangeEvent::Modified(p) | ChangeEvent::Removed(p) => p,
            ChangeEvent::Renamed { to, .. } => to,
        }
    }
}

/// Watches workspace roots using the OS-native mechanism
pub struct WorkspaceWatcher {
    watcher: RecommendedWatcher,
}

impl WorkspaceWatcher {
    /// Creates a watcher and the receiver its events arrive on
    ///
    /// # Errors
    /// Returns [`SyncError::Watch`] if the OS watcher cannot be created
    pub fn new() -> Result<(Self, mpsc::Receiver<ChangeEvent>), SyncError> {
        let (tx, rx) = mpsc::channel::<ChangeEvent>(CHANNEL_CAPACITY);

        let watcher = RecommendedWatcher::new(
            move |res: Result<notify::Event, notify::Error>| match res {
                Ok(event) => {
                    if let Some(change) = map_notify_event(&event) {
                        if let Err(e) = tx.blocking_send(change) {
                            warn!(error = %e, "Dropping change event, receiver closed");
                        }
                    }
                }
                Err(err) => error!(error = %err, "Workspace watcher error"),
            },
            notify::Config::default(),
        )?;

        Ok((Self { watcher }, rx))
    }

    /// Starts watching a workspace root and everything below it
    pub fn watch(&mut self, path: &Path) -> Result<(), SyncError> {
        info!(path = %path.display(), "Watching workspace");
        self.watcher.watch(path, RecursiveMode::Recursive)?;
        Ok(())
    }

    /// Stops watching a workspace root
    pub fn unwatch(&mut self, path: &Path) -> Result<(), SyncError> {
        info!(path = %path.display(), "No longer watching workspace");
        self.watcher.unwatch(path)?;
        Ok(())
    }
}

/// Converts a raw `notify` event; access events and path-less events are
/// dropped
fn map_notify_event(event: &notify::Event) -> Option<ChangeEvent> {
    let paths = &event.paths;
    let change = match &event.kind {
        EventKind::Create(_) => ChangeEvent::Created(paths.first()?.clone()),
        EventKind::Remove(_) => ChangeEvent::Removed(paths.first()?.clone()),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) if paths.len() >= 2 => {
            ChangeEvent::Renamed {
                from: paths[0].clone(),
                to: paths[1].clone(),
            }
        }
        EventKind::Modify(_) => ChangeEvent::Modified(paths.first()?.clone()),
        _ => return None,
    };
    debug!(event = ?change, "Mapped filesystem event");
    Some(change)
}
