//! Workspace descriptors
//!
//! A workspace is a named root scope, either backed by the Lens server or
//! purely local. The host stores workspaces as `{name, url, type}`
//! descriptors; `url` is the local root directory.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

/// Where a workspace's files live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkspaceKind {
    /// Mirrors a workspace on the Lens server
    #[serde(rename = "Ondsel", alias = "Server")]
    Server,
    /// Local directory only
    Local,
    /// Managed elsewhere; not listed by this client
    External,
}

impl fmt::Display for WorkspaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkspaceKind::Server => write!(f, "Ondsel"),
            WorkspaceKind::Local => write!(f, "Local"),
            WorkspaceKind::External => write!(f, "External"),
        }
    }
}

impl FromStr for WorkspaceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Ondsel" | "Server" => Ok(WorkspaceKind::Server),
            "Local" => Ok(WorkspaceKind::Local),
            "External" => Ok(WorkspaceKind::External),
            other => Err(DomainError::UnknownWorkspaceKind(other.to_string())),
        }
    }
}

/// Host-side description of a workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceDescriptor {
    pub name: String,
    /// Local root directory
    pub url: PathBuf,
    #[serde(rename = "type")]
    pub kind: WorkspaceKind,
    /// Identifier of the server workspace, for `Server` workspaces
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
}
