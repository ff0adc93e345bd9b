//! Upload and download commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use lens_core::domain::newtypes::UniqueFileName;

use crate::context::{api_error, AppContext};
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct UploadCommand {
    /// Local file to upload
    pub path: PathBuf,
}

impl UploadCommand {
    pub async fn execute(&self, ctx: AppContext, format: OutputFormat) -> Result<()> {
        let fmt = get_formatter(format);
        let unique_name = UniqueFileName::for_path(&self.path);
        let mut client = ctx.client();

        let response = client
            .upload_file(&unique_name, &self.path)
            .await
            .map_err(|e| api_error(e, "upload file"))?;

        if format == OutputFormat::Json {
            fmt.print_json(&serde_json::json!({
                "path": self.path,
                "unique_file_name": unique_name.as_str(),
                "response": response,
            }));
        } else {
            fmt.success(&format!("Uploaded {}", self.path.display()));
            fmt.info(&format!("Stored as {unique_name}"));
        }
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct DownloadCommand {
    /// Unique storage name of the file
    pub unique_name: String,

    /// Destination path; defaults to the unique name in the current directory
    pub dest: Option<PathBuf>,
}

impl DownloadCommand {
    pub async fn execute(&self, ctx: AppContext, format: OutputFormat) -> Result<()> {
        let fmt = get_formatter(format);
        let dest = match &self.dest {
            Some(dest) => dest.clone(),
            None => std::env::current_dir()
                .context("Failed to resolve current directory")?
                .join(&self.unique_name),
        };
        let mut client = ctx.client();

        client
            .download_file(&self.unique_name, &dest)
            .await
            .map_err(|e| api_error(e, "download file"))?;

        fmt.success(&format!("Downloaded {}", dest.display()));
        Ok(())
    }
}
