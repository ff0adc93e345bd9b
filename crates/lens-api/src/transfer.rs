//! File transfer
//!
//! Uploads go to the `upload` endpoint as a multipart form whose single
//! `file` field is named after a random [`UniqueFileName`]. Downloads first
//! resolve `upload/{unique}` to a signed URL, then fetch the bytes from that
//! URL without any Lens headers.
//!
//! Downloads to a path stream into a staging file next to the destination
//! and replace it only once the whole body has arrived, so a failed
//! download leaves an existing local copy untouched.

use std::path::{Path, PathBuf};

use lens_core::domain::errors::LensError;
use lens_core::domain::newtypes::UniqueFileName;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::client::{content_type, status_error, CallData, LensClient, RequestBody};
use crate::query::Params;

/// Response of `upload/{unique}`
#[derive(Debug, Deserialize)]
struct SignedUrl {
    url: String,
}

impl LensClient {
    /// Uploads the file at `path` under `unique_name`
    ///
    /// # Errors
    /// [`LensError::Io`] if `path` is not a readable file; nothing is sent
    /// in that case.
    pub async fn upload_file(
        &mut self,
        unique_name: &UniqueFileName,
        path: &Path,
    ) -> Result<Value, LensError> {
        self.require_auth().await?;
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(LensError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("not a file: {}", path.display()),
            )));
        }

        let bytes = tokio::fs::read(path).await?;
        debug!(path = %path.display(), unique = %unique_name, size = bytes.len(), "Uploading file");
        let part = Part::bytes(bytes).file_name(unique_name.to_string());
        let form = Form::new().part("file", part);

        self.post("upload", RequestBody::Multipart(form)).await
    }

    /// Downloads the bytes stored under `unique_name` to `dest`
    ///
    /// Missing parent directories of `dest` are created.
    pub async fn download_file(&mut self, unique_name: &str, dest: &Path) -> Result<(), LensError> {
        let url = self.resolve_download_url(unique_name).await?;
        self.fetch_to_path(&url, dest).await?;
        info!(unique = unique_name, path = %dest.display(), "Downloaded file");
        Ok(())
    }

    /// Downloads the bytes stored under `unique_name` into an open writer
    pub async fn download_file_to_writer<W>(
        &mut self,
        unique_name: &str,
        writer: &mut W,
    ) -> Result<(), LensError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let url = self.resolve_download_url(unique_name).await?;
        self.fetch_to_writer(&url, writer).await
    }

    /// Downloads a generated object file (e.g. a model's OBJ) from its URL
    pub async fn download_object_file(&mut self, url: &str, dest: &Path) -> Result<(), LensError> {
        self.require_auth().await?;
        self.fetch_to_path(url, dest).await
    }

    async fn resolve_download_url(&mut self, unique_name: &str) -> Result<String, LensError> {
        self.require_auth().await?;
        let signed: SignedUrl = self
            .get(&format!("upload/{unique_name}"), &Params::new())
            .await?;
        Ok(signed.url)
    }

    /// Fetches `url` into a file at `dest`
    ///
    /// Nothing on disk changes until the server has answered 200. The body
    /// is staged in a temporary sibling of `dest`, which is dropped on
    /// failure and renamed over `dest` on success.
    async fn fetch_to_path(&mut self, url: &str, dest: &Path) -> Result<(), LensError> {
        let response = self.start_fetch(url).await?;

        let parent = staging_dir(dest);
        tokio::fs::create_dir_all(&parent).await?;
        let staging = tempfile::Builder::new()
            .prefix(".lens-")
            .suffix(".part")
            .tempfile_in(&parent)?;
        let mut file = tokio::fs::File::from_std(staging.reopen()?);
        stream_body(response, &mut file).await?;
        drop(file);

        staging.persist(dest).map_err(|e| LensError::Io(e.error))?;
        Ok(())
    }

    /// Fetches `url` and streams the body into `writer`
    async fn fetch_to_writer<W>(&mut self, url: &str, writer: &mut W) -> Result<(), LensError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let response = self.start_fetch(url).await?;
        stream_body(response, writer).await
    }

    /// GETs an absolute URL and returns the response once it is a 200
    async fn start_fetch(&mut self, url: &str) -> Result<Response, LensError> {
        self.ensure_online().await?;

        let request = self.http().get(url);
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Download got no response");
                return Err(self.classify_send_error(e).await);
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            let content_type = content_type(&response);
            let body = response.text().await.unwrap_or_default();
            let params = Params::new();
            let method = Method::GET;
            let call = CallData {
                method: &method,
                target: url,
                params: &params,
            };
            return Err(status_error(call, status, &content_type, &body));
        }
        Ok(response)
    }
}

async fn stream_body<W>(mut response: Response, writer: &mut W) -> Result<(), LensError>
where
    W: AsyncWrite + Unpin + Send,
{
    let mut written = 0usize;
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| LensError::Connection(e.to_string()))?
    {
        writer.write_all(&chunk).await?;
        written += chunk.len();
    }
    writer.flush().await?;
    debug!(bytes = written, "Download complete");
    Ok(())
}

/// Directory holding `dest`; the current directory for a bare file name
fn staging_dir(dest: &Path) -> PathBuf {
    match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

