//! On-disk cache for the download token.

use ceda_core::{CedaError, DownloadToken, Result, TokenResponse};
use std::path::{Path, PathBuf};

/// What the cache file currently holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenCacheState {
    /// A parsed token (possibly expired)
    Cached(DownloadToken),
    /// No cache file
    Absent,
    /// Cache file exists but could not be read or parsed
    Corrupt(String),
}

impl TokenCacheState {
    /// The cached token, if any
    #[must_use]
    pub fn token(self) -> Option<DownloadToken> {
        match self {
            Self::Cached(token) => Some(token),
            Self::Absent | Self::Corrupt(_) => None,
        }
    }
}

/// Token cache at a fixed path. The file holds the token endpoint's JSON
/// response exactly as received.
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    /// Cache backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Cache file location
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cache. Never fails; problems are reported in the state.
    pub async fn load(&self) -> TokenCacheState {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return TokenCacheState::Absent,
            Err(e) => return TokenCacheState::Corrupt(e.to_string()),
        };

        match TokenResponse::parse(&content) {
            Ok(response) => TokenCacheState::Cached(response.into()),
            Err(reason) => TokenCacheState::Corrupt(reason),
        }
    }

    /// Replace the cache with `body`, written verbatim
    pub async fn store_raw(&self, body: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CedaError::io(parent, e))?;
        }
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|e| CedaError::io(&self.path, e))
    }

    /// Delete the cache file. Missing files are fine.
    pub async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CedaError::io(&self.path, e)),
        }
    }
}
