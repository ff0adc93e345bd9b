//! Remote records as returned by the Lens API
//!
//! These are read-only cached copies of backend data. Field names follow the
//! API's camelCase JSON with `_id` identifiers. Timestamps are epoch
//! milliseconds. Unknown fields are kept in `extra` where a record can be
//! sent back to the server in an update.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One page of a paginated list endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(bound = "T: Deserialize<'de>")]
pub struct ListPage<T> {
    /// Records on this page
    #[serde(default)]
    pub data: Vec<T>,
    /// Total number of records matching the query
    #[serde(default)]
    pub total: Option<u64>,
    /// Page size applied by the server
    #[serde(default)]
    pub limit: Option<u64>,
    /// Offset applied by the server
    #[serde(default)]
    pub skip: Option<u64>,
}

/// A Lens user account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    /// Subscription tier, e.g. "Solo" or "Peer"
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reference to a directory embedded in another record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryRef {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Reference to a workspace embedded in another record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceRef {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_name: Option<String>,
}

/// A file stored on the server, with its version history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    #[serde(rename = "_id")]
    pub id: String,
    /// User-visible file name
    #[serde(default)]
    pub cust_file_name: String,
    /// Identifier of the active version
    #[serde(default)]
    pub current_version_id: Option<String>,
    #[serde(default)]
    pub directory: Option<DirectoryRef>,
    #[serde(default)]
    pub workspace: Option<WorkspaceRef>,
    #[serde(default)]
    pub versions: Vec<FileVersion>,
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub is_system_generated: bool,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl FileRecord {
    /// Finds a version by identifier
    pub fn version(&self, version_id: &str) -> Option<&FileVersion> {
        self.versions.iter().find(|v| v.id == version_id)
    }

    /// The currently active version, if known
    pub fn active_version(&self) -> Option<&FileVersion> {
        self.current_version_id
            .as_deref()
            .and_then(|id| self.version(id))
    }
}

/// One committed version of a file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileVersion {
    #[serde(rename = "_id")]
    pub id: String,
    /// Storage key of this version's bytes
    #[serde(default)]
    pub unique_file_name: String,
    #[serde(default)]
    pub message: Option<String>,
    /// Modification time of the local file when it was committed
    #[serde(default)]
    pub file_updated_at: Option<i64>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub additional_data: Value,
}

/// A model: a file with generated viewer data (OBJ, thumbnail)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    /// User-visible file name, used to locate the local copy
    #[serde(default)]
    pub cust_file_name: String,
    /// Storage key of the current bytes
    #[serde(default)]
    pub unique_file_name: String,
    #[serde(default)]
    pub created_at: i64,
    /// Last update on the server, epoch milliseconds
    #[serde(default)]
    pub updated_at: i64,
    #[serde(default)]
    pub is_shared_model: bool,
    #[serde(default)]
    pub file_id: Option<String>,
    #[serde(default)]
    pub file: Option<FileRecord>,
    #[serde(default)]
    pub obj_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub attributes: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Summary of a file listed inside a directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub cust_file_name: String,
}

/// A directory in a workspace hierarchy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Directory {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub workspace: Option<WorkspaceRef>,
    #[serde(default)]
    pub parent_directory: Option<DirectoryRef>,
    /// Child directories
    #[serde(default)]
    pub directories: Vec<DirectoryRef>,
    #[serde(default)]
    pub files: Vec<FileSummary>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Directory {
    /// A reference to this directory suitable for embedding in payloads
    pub fn to_ref(&self) -> DirectoryRef {
        DirectoryRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// A server-side workspace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ref_name: Option<String>,
    /// Whether the workspace is publicly visible
    #[serde(default)]
    pub open: bool,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub root_directory: Option<DirectoryRef>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WorkspaceRecord {
    /// A reference to this workspace suitable for embedding in payloads
    pub fn to_ref(&self) -> WorkspaceRef {
        WorkspaceRef {
            id: self.id.clone(),
            name: self.name.clone(),
            ref_name: self.ref_name.clone(),
        }
    }
}

/// An organization owning workspaces and preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ref_name: Option<String>,
    /// "Personal", "Open", or "Ondsel" for the platform organization
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Set once preferences have been uploaded for the organization
    #[serde(default)]
    pub preferences_id: Option<String>,
    #[serde(default)]
    pub org_secondary_references_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Curated metadata attached to public items (share links, workspaces,
/// organizations) and returned by keyword search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Curation {
    #[serde(rename = "_id", default)]
    pub id: String,
    /// Kind of item curated, e.g. "shared-models" or "workspaces"
    #[serde(default)]
    pub collection_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub long_description_md: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub nav: Value,
    #[serde(default)]
    pub representative_file: Option<Value>,
    #[serde(default)]
    pub keyword_refs: Vec<String>,
}
