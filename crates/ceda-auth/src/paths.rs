//! Filesystem locations for persisted credentials.

use ceda_core::{CedaError, Result};
use directories::BaseDirs;
use std::path::{Path, PathBuf};

/// Where certificates, trust roots, the derived client config and the
/// token cache live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialPaths {
    /// Directory holding the credential file and trust roots
    pub certs_dir: PathBuf,

    /// Certificate chain + private key (PEM)
    pub credentials: PathBuf,

    /// CA certificates from the trust-root service
    pub trustroots_dir: PathBuf,

    /// Derived client config (`.dodsrc`). `None` skips both the marker
    /// check and writing the file.
    pub dodsrc: Option<PathBuf>,

    /// Cookie jar path written into the derived config
    pub cookie_jar: PathBuf,

    /// Download token cache (JSON)
    pub token_cache: PathBuf,
}

impl CredentialPaths {
    /// Default layout under the user's home directory:
    /// `~/.certs/credentials.pem`, `~/.certs/ca-trustroots`, `~/.dodsrc`
    /// and `~/.cedatoken`.
    pub fn from_home() -> Result<Self> {
        let dirs = BaseDirs::new()
            .ok_or_else(|| CedaError::Config("could not determine home directory".into()))?;
        let home = dirs.home_dir();
        let certs_dir = home.join(".certs");

        Ok(Self {
            credentials: certs_dir.join("credentials.pem"),
            trustroots_dir: certs_dir.join("ca-trustroots"),
            certs_dir,
            dodsrc: Some(home.join(".dodsrc")),
            cookie_jar: PathBuf::from("./dods_cookies"),
            token_cache: home.join(".cedatoken"),
        })
    }

    /// Same layout rooted at `root` instead of the home directory
    pub fn in_dir(root: &Path) -> Self {
        let certs_dir = root.join(".certs");
        Self {
            credentials: certs_dir.join("credentials.pem"),
            trustroots_dir: certs_dir.join("ca-trustroots"),
            certs_dir,
            dodsrc: Some(root.join(".dodsrc")),
            cookie_jar: root.join("dods_cookies"),
            token_cache: root.join(".cedatoken"),
        }
    }

    /// Drop the derived client config
    #[must_use]
    pub fn without_dodsrc(mut self) -> Self {
        self.dodsrc = None;
        self
    }

    /// Move the certificate directory, keeping file names
    #[must_use]
    pub fn with_certs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.certs_dir = dir.into();
        self.credentials = self.certs_dir.join("credentials.pem");
        self.trustroots_dir = self.certs_dir.join("ca-trustroots");
        self
    }
}
