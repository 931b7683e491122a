//! Client configuration types.

/// Default trust-root distribution endpoint
pub const DEFAULT_TRUSTROOTS_URL: &str = "https://slcs.ceda.ac.uk/onlineca/trustroots/";

/// Default certificate-issuance endpoint
pub const DEFAULT_CERTIFICATE_URL: &str = "https://slcs.ceda.ac.uk/onlineca/certificate/";

/// Default download-token endpoint
pub const DEFAULT_TOKEN_URL: &str = "https://services-beta.ceda.ac.uk/api/token/create/";

/// Locations of the three credential services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    /// Trust-root distribution service
    pub trustroots: String,

    /// Short-lived certificate issuance service
    pub certificate: String,

    /// Download token issuance service
    pub token: String,
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        Self {
            trustroots: DEFAULT_TRUSTROOTS_URL.to_string(),
            certificate: DEFAULT_CERTIFICATE_URL.to_string(),
            token: DEFAULT_TOKEN_URL.to_string(),
        }
    }
}

impl ServiceEndpoints {
    /// Point every service at the same base URL (useful for testing).
    ///
    /// Paths match the production services.
    #[must_use]
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            trustroots: format!("{base}/onlineca/trustroots/"),
            certificate: format!("{base}/onlineca/certificate/"),
            token: format!("{base}/api/token/create/"),
        }
    }

    /// Set the trust-root service URL
    #[must_use]
    pub fn trustroots(mut self, url: impl Into<String>) -> Self {
        self.trustroots = url.into();
        self
    }

    /// Set the certificate service URL
    #[must_use]
    pub fn certificate(mut self, url: impl Into<String>) -> Self {
        self.certificate = url.into();
        self
    }

    /// Set the token service URL
    #[must_use]
    pub fn token(mut self, url: impl Into<String>) -> Self {
        self.token = url.into();
        self
    }
}
