use thiserror::Error;

/// Result type alias for CEDA credential and download operations
pub type Result<T> = std::result::Result<T, CedaError>;

/// Errors that can occur while obtaining credentials or fetching archive data
#[derive(Error, Debug)]
pub enum CedaError {
    /// Username or password not available from the credential source
    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    /// Trust-root or certificate-issuance service failed
    #[error("{service} service failed: {message}")]
    CredentialService {
        /// Which service failed (e.g. "trust-root", "certificate")
        service: &'static str,
        /// Failure description
        message: String,
    },

    /// Token endpoint did not issue a usable token
    #[error("failed to fetch token ({status}): {message}")]
    TokenIssuance {
        /// HTTP status code returned by the token endpoint
        status: u16,
        /// Failure description
        message: String,
    },

    /// Archive data request returned a non-success status
    #[error("failed to fetch data from {url}: server responded with {status}")]
    Download {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Filesystem operation failed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path involved in the failed operation
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Key generation or certificate request encoding failed
    #[error("crypto error: {0}")]
    Crypto(String),
}

impl CedaError {
    /// Build an [`CedaError::Io`] from a path and an I/O error
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Build a trust-root service failure
    pub fn trust_roots(message: impl Into<String>) -> Self {
        Self::CredentialService {
            service: "trust-root",
            message: message.into(),
        }
    }

    /// Build a certificate-issuance service failure
    pub fn certificate(message: impl Into<String>) -> Self {
        Self::CredentialService {
            service: "certificate",
            message: message.into(),
        }
    }

    /// Returns true if the error is due to rejected or missing credentials
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::MissingCredentials(_)
                | Self::TokenIssuance {
                    status: 401 | 403,
                    ..
                }
                | Self::Download {
                    status: 401 | 403,
                    ..
                }
        )
    }

    /// Returns true if the error came from obtaining a credential
    #[must_use]
    pub const fn is_credential_error(&self) -> bool {
        matches!(
            self,
            Self::MissingCredentials(_) | Self::CredentialService { .. } | Self::TokenIssuance { .. }
        )
    }

    /// Returns the HTTP status code if the server answered
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::TokenIssuance { status, .. } | Self::Download { status, .. } => Some(*status),
            _ => None,
        }
    }
}
