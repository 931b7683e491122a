//! Archive data access.

use crate::CedaClient;
use ceda_core::{CedaError, DownloadToken, Result};
use reqwest::header::AUTHORIZATION;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Archive data endpoint
pub struct DataApi<'a> {
    client: &'a CedaClient,
}

impl<'a> DataApi<'a> {
    pub(crate) fn new(client: &'a CedaClient) -> Self {
        Self { client }
    }

    async fn get(&self, url: &str, token: Option<&DownloadToken>) -> Result<reqwest::Response> {
        let parsed = url::Url::parse(url).map_err(|e| CedaError::InvalidUrl(format!("{url}: {e}")))?;
        debug!(
            url = %parsed,
            bearer = token.is_some(),
            client_cert = self.client.presents_identity(),
            "GET archive data"
        );

        let mut request = self.client.http().get(parsed);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, token.bearer_header());
        }

        let response = request
            .send()
            .await
            .map_err(|e| CedaError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(CedaError::Download {
                status,
                url: url.to_string(),
            });
        }
        Ok(response)
    }

    /// Fetch a file into memory
    pub async fn fetch(&self, url: &str, token: Option<&DownloadToken>) -> Result<Vec<u8>> {
        let response = self.get(url, token).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| CedaError::Http(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    /// Stream a file to `dest`, overwriting it. Returns the number of bytes written.
    ///
    /// The body goes to `<dest>.part` first and is renamed into place once
    /// complete. Nothing is left behind unless the whole body arrived.
    pub async fn download(
        &self,
        url: &str,
        token: Option<&DownloadToken>,
        dest: &Path,
    ) -> Result<u64> {
        let mut response = self.get(url, token).await?;

        let mut partial = PartialFile::create(dest).await?;
        let written = match copy_body(&mut response, &mut partial).await {
            Ok(written) => written,
            Err(e) => {
                partial.discard().await;
                return Err(e);
            }
        };
        partial.commit().await?;

        info!(path = %dest.display(), bytes = written, "download complete");
        Ok(written)
    }
}

async fn copy_body(response: &mut reqwest::Response, partial: &mut PartialFile) -> Result<u64> {
    let mut written = 0u64;
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| CedaError::Http(e.to_string()))?
    {
        partial.write(&chunk).await?;
        written += chunk.len() as u64;
    }
    Ok(written)
}

/// A download being written next to its final location
struct PartialFile {
    part: PathBuf,
    dest: PathBuf,
    file: tokio::fs::File,
}

impl PartialFile {
    async fn create(dest: &Path) -> Result<Self> {
        let part = part_path(dest);
        let file = tokio::fs::File::create(&part)
            .await
            .map_err(|e| CedaError::io(&part, e))?;
        Ok(Self {
            part,
            dest: dest.to_path_buf(),
            file,
        })
    }

    async fn write(&mut self, chunk: &[u8]) -> Result<()> {
        self.file
            .write_all(chunk)
            .await
            .map_err(|e| CedaError::io(&self.part, e))
    }

    /// Flush and move the file into place
    async fn commit(self) -> Result<()> {
        let Self { part, dest, mut file } = self;

        let flushed = file.flush().await;
        drop(file);
        if let Err(e) = flushed {
            remove_quietly(&part).await;
            return Err(CedaError::io(&part, e));
        }

        if let Err(e) = tokio::fs::rename(&part, &dest).await {
            remove_quietly(&part).await;
            return Err(CedaError::io(&dest, e));
        }
        Ok(())
    }

    /// Drop the incomplete file, leaving `dest` untouched
    async fn discard(self) {
        let Self { part, file, .. } = self;
        drop(file);
        remove_quietly(&part).await;
    }
}

async fn remove_quietly(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        debug!(path = %path.display(), error = %e, "could not remove partial download");
    }
}

/// `<dest>.part` in the same directory
fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().map(OsString::from).unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}

/// Local file name for a data URL: the last non-empty path segment.
pub fn file_name_from_url(url: &str) -> Result<String> {
    let parsed = url::Url::parse(url).map_err(|e| CedaError::InvalidUrl(format!("{url}: {e}")))?;
    parsed
        .path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .map(String::from)
        .ok_or_else(|| CedaError::InvalidUrl(format!("{url}: no file name in path")))
}
