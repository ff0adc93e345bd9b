//! Model operations
//!
//! A model is a file plus the viewer data (OBJ, thumbnail) the server
//! generates for it.

use lens_core::domain::errors::LensError;
use lens_core::domain::records::Model;
use serde_json::json;
use tracing::debug;

use crate::client::{LensClient, RequestBody};
use crate::query::Params;

impl LensClient {
    /// Lists the user's own models
    ///
    /// Shared-model clones are always filtered out with
    /// `isSharedModel=false`. `params` override the pagination defaults.
    pub async fn get_models(&mut self, params: Params) -> Result<Vec<Model>, LensError> {
        self.require_auth().await?;
        let params = params
            .over(Params::paginated())
            .with("isSharedModel", "false");
        self.list("models", &params).await
    }

    /// Fetches one model
    pub async fn get_model(&mut self, model_id: &str) -> Result<Model, LensError> {
        self.require_auth().await?;
        self.get(&format!("models/{model_id}"), &Params::new()).await
    }

    /// Creates the model for an uploaded file and starts OBJ generation
    pub async fn create_model(&mut self, file_id: &str) -> Result<Model, LensError> {
        self.require_auth().await?;
        debug!(file_id, "Creating model");
        let payload = json!({
            "fileId": file_id,
            "shouldStartObjGeneration": true,
            "createSystemGeneratedShareLink": false,
        });
        self.post("models", RequestBody::Json(payload)).await
    }

    /// Restarts OBJ generation for a model, e.g. after a new version
    pub async fn regenerate_model_obj(
        &mut self,
        model_id: &str,
        file_id: &str,
    ) -> Result<Model, LensError> {
        self.require_auth().await?;
        debug!(model_id, file_id, "Regenerating model OBJ");
        let payload = json!({
            "fileId": file_id,
            "shouldStartObjGeneration": true,
        });
        self.patch(&format!("models/{model_id}"), payload).await
    }

    /// Deletes a model and returns the deleted record
    pub async fn delete_model(&mut self, model_id: &str) -> Result<Model, LensError> {
        self.require_auth().await?;
        self.delete(&format!("models/{model_id}")).await
    }
}
