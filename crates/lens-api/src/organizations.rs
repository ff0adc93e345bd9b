//! Organization and preference operations
//!
//! Preferences are versioned per organization. An organization gains a
//! `preferencesId` once its first preferences version is uploaded.

use lens_core::domain::errors::LensError;
use lens_core::domain::newtypes::UniqueFileName;
use lens_core::domain::records::Organization;
use serde_json::{json, Value};
use tracing::debug;

use crate::client::{LensClient, RequestBody};
use crate::query::Params;

/// Organization type of the platform's own organization
const PLATFORM_ORG_TYPE: &str = "Ondsel";

/// One uploaded preferences file
#[derive(Debug, Clone)]
pub struct PreferenceFile {
    /// User-visible file name, e.g. `user.cfg`
    pub file_name: String,
    /// Storage key the bytes were uploaded under
    pub unique_name: UniqueFileName,
}

impl LensClient {
    /// Lists organizations the user belongs to
    pub async fn get_organizations(
        &mut self,
        params: Params,
    ) -> Result<Vec<Organization>, LensError> {
        self.require_auth().await?;
        self.list("organizations", &params.over(Params::paginated()))
            .await
    }

    /// Fetches one organization
    pub async fn get_organization(&mut self, org_id: &str) -> Result<Organization, LensError> {
        self.require_auth().await?;
        self.get(&format!("organizations/{org_id}"), &Params::new())
            .await
    }

    /// The platform's default organization
    ///
    /// Public: no session is needed.
    pub async fn get_default_organization(&mut self) -> Result<Organization, LensError> {
        let params = Params::new()
            .with("type", PLATFORM_ORG_TYPE)
            .with("publicInfo", "true");
        let organizations: Vec<Organization> = self.list("organizations", &params).await?;
        organizations
            .into_iter()
            .next()
            .ok_or_else(|| LensError::NotFound {
                endpoint: "organizations".to_string(),
            })
    }

    /// Fetches an organization's secondary references (bookmarks and
    /// followed items)
    pub async fn get_secondary_refs(&mut self, refs_id: &str) -> Result<Value, LensError> {
        self.require_auth().await?;
        self.get(&format!("org-secondary-references/{refs_id}"), &Params::new())
            .await
    }

    /// Uploads a new preferences version for an organization
    ///
    /// Commits a new version when the organization already has preferences,
    /// otherwise creates them. The user and system configuration files must
    /// already be uploaded.
    pub async fn upload_prefs(
        &mut self,
        org_id: &str,
        user_config: &PreferenceFile,
        system_config: &PreferenceFile,
    ) -> Result<Value, LensError> {
        let organization = self.get_organization(org_id).await?;

        let message = if organization.preferences_id.is_some() {
            "Update preferences"
        } else {
            "Initial commit preferences"
        };
        let version = json!({
            "files": [
                {
                    "fileName": user_config.file_name,
                    "uniqueFileName": user_config.unique_name.as_str(),
                    "additionalData": { "message": message },
                    "additionalKeysToSave": {},
                },
                {
                    "fileName": system_config.file_name,
                    "uniqueFileName": system_config.unique_name.as_str(),
                    "additionalData": {},
                    "additionalKeysToSave": {},
                },
            ],
        });

        match organization.preferences_id {
            Some(prefs_id) => {
                debug!(org_id, prefs_id = %prefs_id, "Committing new preferences version");
                let payload = json!({
                    "shouldCommitNewVersion": true,
                    "version": version,
                });
                self.patch(&format!("preferences/{prefs_id}"), payload)
                    .await
            }
            None => {
                debug!(org_id, "Creating organization preferences");
                let payload = json!({
                    "organizationId": org_id,
                    "version": version,
                });
                self.post("preferences", RequestBody::Json(payload)).await
            }
        }
    }

    /// Fetches preferences by id; `None` when the organization has none
    pub async fn download_prefs(
        &mut self,
        prefs_id: Option<&str>,
    ) -> Result<Option<Value>, LensError> {
        self.require_auth().await?;
        match prefs_id {
            Some(id) => self
                .get(&format!("preferences/{id}"), &Params::new())
                .await
                .map(Some),
            None => Ok(None),
        }
    }
}
