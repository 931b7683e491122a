//! Configuration management.

use anyhow::Result;
use ceda::{CredentialPaths, ServiceEndpoints};
use clap::ValueEnum;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

/// Environment variable overriding the config file location
pub const CONFIG_PATH_VAR: &str = "CEDAFETCH_CONFIG";

/// Largest accepted refresh margin (100 years)
pub const MAX_MIN_LIFETIME_SECS: u64 = 100 * 365 * 24 * 60 * 60;

/// Refresh margin of `secs` seconds, capped at [`MAX_MIN_LIFETIME_SECS`]
pub fn margin_from_secs(secs: u64) -> chrono::Duration {
    let capped = i64::try_from(secs.min(MAX_MIN_LIFETIME_SECS)).unwrap_or(i64::MAX);
    chrono::Duration::try_seconds(capped).unwrap_or(chrono::Duration::MAX)
}

/// How a download authenticates to the archive.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    /// Bearer download token
    #[default]
    Token,
    /// Short-lived client certificate
    Cert,
    /// Anonymous request
    None,
}

impl std::str::FromStr for AuthMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "token" => Ok(Self::Token),
            "cert" | "certificate" => Ok(Self::Cert),
            "none" | "anonymous" => Ok(Self::None),
            _ => anyhow::bail!(
                "Unknown auth method: {}\n\
                 Valid methods: token, cert, none",
                s
            ),
        }
    }
}

impl std::fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token => write!(f, "token"),
            Self::Cert => write!(f, "cert"),
            Self::None => write!(f, "none"),
        }
    }
}

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Trust-root service URL.
    pub trustroots_url: Option<String>,

    /// Certificate service URL.
    pub certificate_url: Option<String>,

    /// Token service URL.
    pub token_url: Option<String>,

    /// Directory holding the credential file and trust roots.
    pub certs_dir: Option<String>,

    /// Derived client config location.
    pub dodsrc: Option<String>,

    /// Write the derived client config and require it when reusing a certificate.
    #[serde(default = "default_true")]
    pub write_dodsrc: bool,

    /// Cookie jar recorded in the derived client config.
    pub cookie_jar: Option<String>,

    /// Download token cache location.
    pub token_cache: Option<String>,

    /// Auth method used by `download` when `--auth` is not given.
    pub default_auth: Option<AuthMethod>,

    /// Refresh cached tokens expiring within this many seconds.
    #[serde(default)]
    pub token_min_lifetime_secs: u64,

    /// HTTP timeout in seconds.
    pub timeout_secs: Option<u64>,

    /// Default output format.
    pub output_format: Option<OutputFormat>,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trustroots_url: None,
            certificate_url: None,
            token_url: None,
            certs_dir: None,
            dodsrc: None,
            write_dodsrc: true,
            cookie_jar: None,
            token_cache: None,
            default_auth: None,
            token_min_lifetime_secs: 0,
            timeout_secs: None,
            output_format: None,
        }
    }
}

/// Expand `~` and environment variables in a configured path
fn expand(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(path).as_ref()),
    }
}

impl Config {
    /// Get the config file path.
    pub fn path() -> Result<PathBuf> {
        if let Some(custom) = std::env::var_os(CONFIG_PATH_VAR).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(custom));
        }

        let dirs = ProjectDirs::from("uk.ac", "ceda", "cedafetch")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from file.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config file {}: {}", path.display(), e))?;

        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Service endpoints with configured overrides applied.
    pub fn endpoints(&self) -> ServiceEndpoints {
        let mut endpoints = ServiceEndpoints::default();
        if let Some(url) = &self.trustroots_url {
            endpoints = endpoints.trustroots(url.clone());
        }
        if let Some(url) = &self.certificate_url {
            endpoints = endpoints.certificate(url.clone());
        }
        if let Some(url) = &self.token_url {
            endpoints = endpoints.token(url.clone());
        }
        endpoints
    }

    /// Credential locations: home-directory defaults with configured overrides applied.
    pub fn credential_paths(&self) -> Result<CredentialPaths> {
        Ok(self.apply_paths(CredentialPaths::from_home()?))
    }

    fn apply_paths(&self, mut paths: CredentialPaths) -> CredentialPaths {
        if let Some(dir) = &self.certs_dir {
            paths = paths.with_certs_dir(expand(dir));
        }
        if !self.write_dodsrc {
            paths = paths.without_dodsrc();
        } else if let Some(dodsrc) = &self.dodsrc {
            paths.dodsrc = Some(expand(dodsrc));
        }
        if let Some(jar) = &self.cookie_jar {
            paths.cookie_jar = expand(jar);
        }
        if let Some(cache) = &self.token_cache {
            paths.token_cache = expand(cache);
        }
        paths
    }

    /// Token refresh margin.
    pub fn token_min_lifetime(&self) -> chrono::Duration {
        margin_from_secs(self.token_min_lifetime_secs)
    }

    /// Set a key from its string form. Returns the canonical key name.
    pub fn set(&mut self, key: &str, value: &str) -> Result<&'static str> {
        let optional = |value: &str| {
            let value = value.trim();
            (!value.is_empty() && value != "none").then(|| value.to_string())
        };

        let name = match key {
            "trustroots_url" => {
                self.trustroots_url = optional(value);
                "trustroots_url"
            }
            "certificate_url" => {
                self.certificate_url = optional(value);
                "certificate_url"
            }
            "token_url" => {
                self.token_url = optional(value);
                "token_url"
            }
            "certs_dir" => {
                self.certs_dir = optional(value);
                "certs_dir"
            }
            "dodsrc" => {
                self.dodsrc = optional(value);
                "dodsrc"
            }
            "write_dodsrc" => {
                self.write_dodsrc = value.parse()?;
                "write_dodsrc"
            }
            "cookie_jar" => {
                self.cookie_jar = optional(value);
                "cookie_jar"
            }
            "token_cache" => {
                self.token_cache = optional(value);
                "token_cache"
            }
            "default_auth" | "auth" => {
                self.default_auth = Some(value.parse()?);
                "default_auth"
            }
            "token_min_lifetime" | "token_min_lifetime_secs" => {
                let secs: u64 = value.parse()?;
                if secs > MAX_MIN_LIFETIME_SECS {
                    anyhow::bail!(
                        "token_min_lifetime must be at most {} seconds",
                        MAX_MIN_LIFETIME_SECS
                    );
                }
                self.token_min_lifetime_secs = secs;
                "token_min_lifetime_secs"
            }
            "timeout" | "timeout_secs" => {
                self.timeout_secs = Some(value.parse()?);
                "timeout_secs"
            }
            "output_format" | "output" => {
                self.output_format = Some(value.parse()?);
                "output_format"
            }
            _ => anyhow::bail!(
                "Unknown config key: {}\n\n\
                 Available keys:\n  \
                 trustroots_url       - Trust-root service URL\n  \
                 certificate_url      - Certificate service URL\n  \
                 token_url            - Token service URL\n  \
                 certs_dir            - Certificate directory (default ~/.certs)\n  \
                 dodsrc               - Derived client config (default ~/.dodsrc)\n  \
                 write_dodsrc         - Maintain the derived client config (true/false)\n  \
                 cookie_jar           - Cookie jar recorded in the client config\n  \
                 token_cache          - Token cache file (default ~/.cedatoken)\n  \
                 default_auth         - Download auth method (token/cert/none)\n  \
                 token_min_lifetime   - Token refresh margin in seconds\n  \
                 timeout              - HTTP timeout in seconds\n  \
                 output_format        - Default output format (pretty/json)",
                key
            ),
        };

        Ok(name)
    }
}
