//! Directory operations
//!
//! A directory lists its children twice: each child names its
//! `parentDirectory`, and the parent keeps a `directories` array. Creating
//! a child therefore takes two calls, see
//! [`LensClient::create_subdirectory`].

use lens_core::domain::errors::LensError;
use lens_core::domain::records::{Directory, DirectoryRef, WorkspaceRef};
use serde_json::json;
use tracing::{debug, warn};

use crate::client::{LensClient, RequestBody};
use crate::query::Params;

impl LensClient {
    /// Lists directories
    pub async fn get_directories(&mut self, params: Params) -> Result<Vec<Directory>, LensError> {
        self.require_auth().await?;
        self.list("directories", &params.over(Params::paginated()))
            .await
    }

    /// Fetches one directory
    pub async fn get_directory(&mut self, directory_id: &str) -> Result<Directory, LensError> {
        self.require_auth().await?;
        self.get(&format!("directories/{directory_id}"), &Params::new())
            .await
    }

    /// Fetches a directory, falling back to its public view
    ///
    /// The server answers a private query for someone else's directory with
    /// a 400 rather than a 403 or 404, so a request error retries with
    /// `publicInfo=true`.
    pub async fn get_directory_including_public(
        &mut self,
        directory_id: &str,
    ) -> Result<Directory, LensError> {
        self.require_auth().await?;
        let endpoint = format!("directories/{directory_id}");
        match self.get(&endpoint, &Params::new()).await {
            Err(LensError::Request { status, .. }) => {
                warn!(directory_id, status, "Directory refused privately, trying public view");
                self.get(&endpoint, &Params::public_info()).await
            }
            other => other,
        }
    }

    /// Creates a directory under `parent`
    ///
    /// This does not register the child on the parent; use
    /// [`LensClient::create_subdirectory`] for that.
    pub async fn create_directory(
        &mut self,
        name: &str,
        parent: &DirectoryRef,
        workspace: &WorkspaceRef,
    ) -> Result<Directory, LensError> {
        self.require_auth().await?;
        debug!(name, parent = %parent.name, "Creating directory");
        let payload = json!({
            "name": name,
            "workspace": workspace,
            "parentDirectory": {
                "_id": parent.id,
                "name": parent.name,
            },
        });
        self.post("directories", RequestBody::Json(payload)).await
    }

    /// Creates a directory and attaches it to its parent's `directories`
    ///
    /// Two calls: a create, then a PATCH of the parent with the new id
    /// appended. The sequence is not atomic. If the attach fails the new
    /// directory still exists on the server and the error propagates; no
    /// rollback is attempted.
    pub async fn create_subdirectory(
        &mut self,
        name: &str,
        parent: &Directory,
        workspace: &WorkspaceRef,
    ) -> Result<Directory, LensError> {
        let created = self
            .create_directory(name, &parent.to_ref(), workspace)
            .await?;

        let mut child_ids: Vec<&str> = parent.directories.iter().map(|d| d.id.as_str()).collect();
        child_ids.push(created.id.as_str());
        let payload = json!({ "directories": child_ids });

        if let Err(e) = self
            .patch::<Directory>(&format!("directories/{}", parent.id), payload)
            .await
        {
            warn!(
                directory_id = %created.id,
                parent_id = %parent.id,
                error = %e,
                "Created directory could not be attached to its parent"
            );
            return Err(e);
        }
        Ok(created)
    }

    /// Sends the whole record as an update
    pub async fn update_directory(&mut self, directory: &Directory) -> Result<Directory, LensError> {
        self.require_auth().await?;
        let payload = serde_json::to_value(directory)
            .map_err(|e| LensError::InvalidResponse(e.to_string()))?;
        self.patch(&format!("directories/{}", directory.id), payload)
            .await
    }

    /// Deletes a directory and returns the deleted record
    pub async fn delete_directory(&mut self, directory_id: &str) -> Result<Directory, LensError> {
        self.require_auth().await?;
        self.delete(&format!("directories/{directory_id}")).await
    }
}
