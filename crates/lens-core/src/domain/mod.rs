//! Domain entities and business logic
//!
//! This module contains the core domain types for Lens:
//! - The connection state machine and credentials
//! - The error taxonomy reported by the API client
//! - Remote records (models, files, directories, workspaces, organizations)
//! - Share links
//! - Local file entries and their synchronization status
//! - Workspace descriptors
//! - Validated newtypes

pub mod connection;
pub mod errors;
pub mod file_entry;
pub mod newtypes;
pub mod records;
pub mod share_link;
pub mod workspace;

// Re-export commonly used types
pub use connection::{ConnStatus, ConnectionEvent, ConnectionState, Credentials, Session};
pub use errors::{DomainError, LensError};
pub use file_entry::{FileEntry, SyncStatus};
pub use newtypes::UniqueFileName;
pub use records::{
    Curation, Directory, DirectoryRef, FileRecord, FileSummary, FileVersion, ListPage, Model,
    Organization, User, WorkspaceRecord, WorkspaceRef,
};
pub use share_link::{FileDetail, Protection, ShareLink, UserSummary, VersionFollow};
pub use workspace::{WorkspaceDescriptor, WorkspaceKind};
