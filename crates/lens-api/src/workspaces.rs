//! Workspace operations

use lens_core::domain::errors::LensError;
use lens_core::domain::records::WorkspaceRecord;
use serde_json::json;
use tracing::{debug, warn};

use crate::client::{LensClient, RequestBody};
use crate::query::Params;

impl LensClient {
    /// Lists workspaces the user can see
    pub async fn get_workspaces(
        &mut self,
        params: Params,
    ) -> Result<Vec<WorkspaceRecord>, LensError> {
        self.require_auth().await?;
        self.list("workspaces", &params.over(Params::paginated()))
            .await
    }

    /// Fetches one workspace
    pub async fn get_workspace(&mut self, workspace_id: &str) -> Result<WorkspaceRecord, LensError> {
        self.require_auth().await?;
        self.get(&format!("workspaces/{workspace_id}"), &Params::new())
            .await
    }

    /// Fetches a workspace, falling back to its public view
    ///
    /// The private query is tried first; a 404 retries with
    /// `publicInfo=true`.
    pub async fn get_workspace_including_public(
        &mut self,
        workspace_id: &str,
    ) -> Result<WorkspaceRecord, LensError> {
        self.require_auth().await?;
        let endpoint = format!("workspaces/{workspace_id}");
        match self.get(&endpoint, &Params::new()).await {
            Err(LensError::NotFound { .. }) => {
                warn!(workspace_id, "Workspace not found privately, trying public view");
                self.get(&endpoint, &Params::public_info()).await
            }
            other => other,
        }
    }

    /// Creates a workspace in an organization
    pub async fn create_workspace(
        &mut self,
        name: &str,
        description: &str,
        organization_id: &str,
    ) -> Result<WorkspaceRecord, LensError> {
        self.require_auth().await?;
        debug!(name, organization_id, "Creating workspace");
        let payload = json!({
            "name": name,
            "description": description,
            "organizationId": organization_id,
        });
        self.post("workspaces", RequestBody::Json(payload)).await
    }

    /// Sends the whole record as an update
    pub async fn update_workspace(
        &mut self,
        workspace: &WorkspaceRecord,
    ) -> Result<WorkspaceRecord, LensError> {
        self.require_auth().await?;
        let payload = serde_json::to_value(workspace)
            .map_err(|e| LensError::InvalidResponse(e.to_string()))?;
        self.patch(&format!("workspaces/{}", workspace.id), payload)
            .await
    }

    /// Deletes a workspace and returns the deleted record
    pub async fn delete_workspace(
        &mut self,
        workspace_id: &str,
    ) -> Result<WorkspaceRecord, LensError> {
        self.require_auth().await?;
        self.delete(&format!("workspaces/{workspace_id}")).await
    }
}
