//! ILensProvider implementation for [`LensClient`]
//!
//! Lets the workspace synchronization model run against the real service.

use std::path::Path;

use async_trait::async_trait;
use lens_core::domain::errors::LensError;
use lens_core::domain::records::Model;
use lens_core::ports::ILensProvider;

use crate::client::LensClient;
use crate::query::Params;

#[async_trait]
impl ILensProvider for LensClient {
    async fn get_models(&mut self) -> Result<Vec<Model>, LensError> {
        LensClient::get_models(self, Params::new()).await
    }

    async fn delete_model(&mut self, model_id: &str) -> Result<(), LensError> {
        LensClient::delete_model(self, model_id).await.map(|_| ())
    }

    async fn download_file(&mut self, unique_name: &str, dest: &Path) -> Result<(), LensError> {
        LensClient::download_file(self, unique_name, dest).await
    }
}
