//! Share link operations
//!
//! The server still names this resource `shared-models`.

use lens_core::domain::errors::LensError;
use lens_core::domain::share_link::ShareLink;
use serde_json::{Map, Value};

use crate::client::{LensClient, RequestBody};
use crate::query::Params;

const ENDPOINT: &str = "shared-models";

/// Page size of the public gallery
const PUBLIC_GALLERY_LIMIT: u32 = 25;

impl LensClient {
    /// Lists the user's share links
    ///
    /// An empty `pin` filter is dropped rather than sent.
    pub async fn get_share_links(&mut self, params: Params) -> Result<Vec<ShareLink>, LensError> {
        self.require_auth().await?;
        let mut params = params.over(Params::paginated());
        if params.get("pin") == Some("") {
            params.remove("pin");
        }
        self.list(ENDPOINT, &params).await
    }

    /// The most recent listed share links, newest first
    ///
    /// Public: no session is needed.
    pub async fn get_public_share_links(&mut self) -> Result<Vec<ShareLink>, LensError> {
        let params = Params::new()
            .with("$limit", PUBLIC_GALLERY_LIMIT)
            .with("$skip", 0)
            .with("$sort[createdAt]", -1)
            .with("protection", "Listed")
            .with("isActive", "true")
            .with("isThumbnailGenerated", "true");
        self.list(ENDPOINT, &params).await
    }

    /// Creates a share link from a raw payload
    pub async fn create_share_link(&mut self, payload: Value) -> Result<ShareLink, LensError> {
        self.require_auth().await?;
        self.post(ENDPOINT, RequestBody::Json(payload)).await
    }

    /// Fetches one share link
    pub async fn get_share_link(&mut self, share_link_id: &str) -> Result<ShareLink, LensError> {
        self.require_auth().await?;
        self.get(&format!("{ENDPOINT}/{share_link_id}"), &Params::new())
            .await
    }

    /// Updates a share link
    ///
    /// The record is cleaned up first: see [`share_link_update_payload`].
    pub async fn update_share_link(&mut self, link: &ShareLink) -> Result<ShareLink, LensError> {
        self.require_auth().await?;
        let data = serde_json::to_value(link)
            .map_err(|e| LensError::InvalidResponse(e.to_string()))?;
        let Value::Object(data) = data else {
            return Err(LensError::InvalidResponse(
                "share link did not serialize to an object".to_string(),
            ));
        };
        let payload = share_link_update_payload(data);
        self.patch(&format!("{ENDPOINT}/{}", link.id), Value::Object(payload))
            .await
    }

    /// Deletes a share link and returns the deleted record
    pub async fn delete_share_link(&mut self, share_link_id: &str) -> Result<ShareLink, LensError> {
        self.require_auth().await?;
        self.delete(&format!("{ENDPOINT}/{share_link_id}")).await
    }
}

/// Strips fields the server refuses on update
///
/// - an empty or null `pin` is dropped
/// - a null `dummyModelId` is dropped
/// - `isActive` is dropped for system-generated links
/// - `isSystemGenerated` is always dropped
pub fn share_link_update_payload(mut data: Map<String, Value>) -> Map<String, Value> {
    if matches!(data.get("pin"), Some(Value::Null)) || data.get("pin") == Some(&Value::from("")) {
        data.remove("pin");
    }
    if matches!(data.get("dummyModelId"), Some(Value::Null)) {
        data.remove("dummyModelId");
    }
    if let Some(system_generated) = data.remove("isSystemGenerated") {
        if system_generated.as_bool() == Some(true) {
            data.remove("isActive");
        }
    }
    data
}
