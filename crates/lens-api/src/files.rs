//! File and file-version operations
//!
//! Every upload of new bytes commits a new version on a file. The file
//! tracks which version is active.

use lens_core::domain::errors::LensError;
use lens_core::domain::newtypes::UniqueFileName;
use lens_core::domain::records::{DirectoryRef, FileRecord, FileVersion, WorkspaceRef};
use serde_json::json;
use tracing::{debug, warn};

use crate::client::{LensClient, RequestBody};
use crate::query::Params;

/// Commit message of a file's first version
const INITIAL_COMMIT_MESSAGE: &str = "Initial commit";

impl LensClient {
    /// Lists user files, excluding system-generated ones
    ///
    /// `params` override the pagination defaults.
    pub async fn get_files(&mut self, params: Params) -> Result<Vec<FileRecord>, LensError> {
        self.require_auth().await?;
        let params = params
            .over(Params::paginated())
            .with("isSystemGenerated", "false");
        self.list("file", &params).await
    }

    /// Fetches a file and looks up one of its versions
    ///
    /// With `public` set, the public view (`publicInfo=true`) is tried
    /// first. If the server refuses it with a request error or a 404, the
    /// same file is fetched again as an authenticated private query, and a
    /// failure of that second attempt propagates.
    ///
    /// The version is `None` when `version_id` is not in the file's history.
    pub async fn get_file_version_details(
        &mut self,
        file_id: &str,
        version_id: &str,
        public: bool,
    ) -> Result<(FileRecord, Option<FileVersion>), LensError> {
        self.require_auth().await?;
        let endpoint = format!("file/{file_id}");

        let file: FileRecord = if public {
            match self.get(&endpoint, &Params::public_info()).await {
                Ok(file) => file,
                Err(e @ (LensError::Request { .. } | LensError::NotFound { .. })) => {
                    warn!(file_id, error = %e, "Public file lookup failed, retrying privately");
                    self.get(&endpoint, &Params::new()).await?
                }
                Err(e) => return Err(e),
            }
        } else {
            self.get(&endpoint, &Params::new()).await?
        };

        let version = file.version(version_id).cloned();
        Ok((file, version))
    }

    /// Creates a file whose first version is the uploaded `unique_name`
    ///
    /// `file_updated_at` is the local modification time in epoch
    /// milliseconds.
    pub async fn create_file(
        &mut self,
        file_name: &str,
        file_updated_at: i64,
        unique_name: &UniqueFileName,
        directory: &DirectoryRef,
        workspace: &WorkspaceRef,
    ) -> Result<FileRecord, LensError> {
        self.require_auth().await?;
        debug!(file_name, directory = %directory.name, "Creating file");
        let payload = json!({
            "custFileName": file_name,
            "shouldCommitNewVersion": true,
            "version": {
                "uniqueFileName": unique_name.as_str(),
                "message": INITIAL_COMMIT_MESSAGE,
                "fileUpdatedAt": file_updated_at,
            },
            "directory": directory,
            "workspace": workspace,
        });
        self.post("file", RequestBody::Json(payload)).await
    }

    /// Commits a new version of an existing file
    pub async fn update_file_obj(
        &mut self,
        file_id: &str,
        file_updated_at: i64,
        unique_name: &UniqueFileName,
        directory: &DirectoryRef,
        workspace: &WorkspaceRef,
        message: &str,
    ) -> Result<FileRecord, LensError> {
        self.require_auth().await?;
        debug!(file_id, directory = %directory.name, "Committing new file version");
        let payload = json!({
            "shouldCommitNewVersion": true,
            "version": {
                "uniqueFileName": unique_name.as_str(),
                "fileUpdatedAt": file_updated_at,
                "message": message,
            },
            "directory": directory,
            "workspace": workspace,
        });
        self.patch(&format!("file/{file_id}"), payload).await
    }

    /// Makes an earlier version the active one
    pub async fn set_version_active(
        &mut self,
        file_id: &str,
        version_id: &str,
    ) -> Result<FileRecord, LensError> {
        self.require_auth().await?;
        debug!(file_id, version_id, "Checking out file version");
        let payload = json!({
            "shouldCheckoutToVersion": true,
            "versionId": version_id,
        });
        self.patch(&format!("file/{file_id}"), payload).await
    }

    /// Deletes a file and returns the deleted record
    pub async fn delete_file(&mut self, file_id: &str) -> Result<FileRecord, LensError> {
        self.require_auth().await?;
        self.delete(&format!("file/{file_id}")).await
    }
}
