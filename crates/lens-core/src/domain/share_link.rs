//! Share links
//!
//! A share link grants scoped, possibly public, access to one model. The API
//! and database still call them "shared-models".

use serde::{Deserialize, Serialize};

use super::records::{Curation, Model};

/// Whether a share link follows the file's active version or stays pinned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionFollow {
    Locked,
    Active,
}

/// Who can reach a share link
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Protection {
    /// Listed in the public gallery
    Listed,
    /// Reachable by anyone holding the URL
    #[default]
    Unlisted,
    /// Requires a PIN
    Pin,
    /// Only the users it was shared with
    Direct,
}

/// File and version a share link points at
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDetail {
    #[serde(default)]
    pub file_id: String,
    #[serde(default)]
    pub version_id: String,
}

/// Minimal public view of a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tier: Option<String>,
}

/// A share link record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLink {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
    #[serde(default)]
    pub version_following: Option<VersionFollow>,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub clone_model_id: String,
    #[serde(default)]
    pub model: Model,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub can_view_model: bool,
    #[serde(default)]
    pub can_view_model_attributes: bool,
    #[serde(default)]
    pub can_update_model: bool,
    #[serde(default, rename = "canExportFCStd")]
    pub can_export_fcstd: bool,
    #[serde(default, rename = "canExportSTEP")]
    pub can_export_step: bool,
    #[serde(default, rename = "canExportSTL")]
    pub can_export_stl: bool,
    #[serde(default, rename = "canExportOBJ")]
    pub can_export_obj: bool,
    /// Permission to download the original file
    #[serde(default)]
    pub can_download_default_model: bool,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_system_generated: Option<bool>,
    #[serde(default)]
    pub is_thumbnail_generated: Option<bool>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub file_detail: FileDetail,
    #[serde(default)]
    pub curation: Curation,
    #[serde(default)]
    pub protection: Protection,
    #[serde(default)]
    pub pin: Option<String>,
    #[serde(default)]
    pub direct_shared_to: Vec<UserSummary>,
}

impl ShareLink {
    /// Display name used in listings: the curation name, else the title
    pub fn display_name(&self) -> &str {
        if self.curation.name.is_empty() {
            &self.title
        } else {
            &self.curation.name
        }
    }
}
