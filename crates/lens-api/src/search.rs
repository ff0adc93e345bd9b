//! Keyword search

use lens_core::domain::errors::LensError;
use lens_core::domain::records::Curation;
use serde::Deserialize;

use crate::client::LensClient;
use crate::query::Params;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeywordResult {
    #[serde(default)]
    sorted_matches: Vec<ScoredMatch>,
}

#[derive(Debug, Deserialize)]
struct ScoredMatch {
    curation: Curation,
}

impl LensClient {
    /// Searches curated items by keyword, best match first
    ///
    /// `target` restricts the kind of item, e.g. `"shared-models"`. Public:
    /// no session is needed.
    ///
    /// The server expects `text` form-encoded inside the query value, so it
    /// is encoded once here and again by the query serializer.
    pub async fn get_search_results(
        &mut self,
        text: &str,
        target: Option<&str>,
    ) -> Result<Vec<Curation>, LensError> {
        let encoded: String = url::form_urlencoded::byte_serialize(text.as_bytes()).collect();
        let mut params = Params::new().with("text", encoded);
        if let Some(target) = target {
            params.set("target", target);
        }

        let results: Vec<KeywordResult> = self.list("keywords", &params).await?;
        Ok(results
            .into_iter()
            .next()
            .map(|result| result.sorted_matches.into_iter().map(|m| m.curation).collect())
            .unwrap_or_default())
    }
}
