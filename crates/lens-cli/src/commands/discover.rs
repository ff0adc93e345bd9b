//! Public discovery commands: keyword search and the share-link gallery
//!
//! Both work without logging in.

use anyhow::Result;
use clap::Args;

use crate::context::{api_error, AppContext};
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct SearchCommand {
    /// Words to search for
    pub text: String,

    /// Restrict results to one kind, e.g. `shared-models` or `workspaces`
    #[arg(long)]
    pub target: Option<String>,
}

impl SearchCommand {
    pub async fn execute(&self, ctx: AppContext, format: OutputFormat) -> Result<()> {
        let fmt = get_formatter(format);
        let mut client = ctx.client();
        let results = client
            .get_search_results(&self.text, self.target.as_deref())
            .await
            .map_err(|e| api_error(e, "search"))?;

        if format == OutputFormat::Json {
            fmt.print_json(&serde_json::to_value(&results)?);
            return Ok(());
        }

        fmt.success(&format!("{} result(s) for \"{}\"", results.len(), self.text));
        for curation in &results {
            fmt.info(&format!("{:<16} {}", curation.collection_name, curation.name));
        }
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct GalleryCommand {}

impl GalleryCommand {
    pub async fn execute(&self, ctx: AppContext, format: OutputFormat) -> Result<()> {
        let fmt = get_formatter(format);
        let mut client = ctx.client();
        let links = client
            .get_public_share_links()
            .await
            .map_err(|e| api_error(e, "load the gallery"))?;

        if format == OutputFormat::Json {
            fmt.print_json(&serde_json::to_value(&links)?);
            return Ok(());
        }

        fmt.success(&format!("{} shared model(s)", links.len()));
        for link in &links {
            let created = chrono::DateTime::from_timestamp_millis(link.created_at)
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            fmt.info(&format!("{:<10} {:<40} {}", created, link.display_name(), link.id));
        }
        Ok(())
    }
}
