//! Lens provider port (driven/secondary port)
//!
//! The subset of remote operations the workspace synchronization model
//! depends on. `lens_api::LensClient` is the production implementation;
//! tests use in-memory fakes.
//!
//! ## Design Notes
//!
//! - Uses the domain [`LensError`] so callers can distinguish offline and
//!   logged-out failures from server refusals.
//! - Methods take `&mut self`: a provider may authenticate or re-probe
//!   connectivity as a side effect of any call.

use std::path::Path;

use async_trait::async_trait;

use crate::domain::errors::LensError;
use crate::domain::records::Model;

/// Remote operations used by workspace synchronization
#[async_trait]
pub trait ILensProvider: Send {
    /// Lists the user's (non-shared) models, in server order
    async fn get_models(&mut self) -> Result<Vec<Model>, LensError>;

    /// Deletes a model by identifier
    async fn delete_model(&mut self, model_id: &str) -> Result<(), LensError>;

    /// Downloads the bytes stored under `unique_name` to `dest`
    async fn download_file(&mut self, unique_name: &str, dest: &Path) -> Result<(), LensError>;
}
