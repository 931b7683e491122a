//! Main CEDA client implementation.

use crate::api::{CertificateApi, DataApi, TokenApi, TrustRootsApi};
use crate::config::ServiceEndpoints;
use base64::{engine::general_purpose::STANDARD as B64, Engine};
use ceda_core::{CedaError, Credentials, Result};
use reqwest::Client as HttpClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the CEDA credential services and archive
#[derive(Clone)]
pub struct CedaClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    endpoints: ServiceEndpoints,
    presents_identity: bool,
}

impl CedaClient {
    /// Create a client for the production services using default settings
    pub fn new() -> Result<Self> {
        CedaClientBuilder::new().build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder() -> CedaClientBuilder {
        CedaClientBuilder::new()
    }

    /// Access the trust-root distribution service
    #[must_use]
    pub fn trust_roots(&self) -> TrustRootsApi<'_> {
        TrustRootsApi::new(self)
    }

    /// Access the certificate-issuance service
    #[must_use]
    pub fn certificates(&self) -> CertificateApi<'_> {
        CertificateApi::new(self)
    }

    /// Access the download-token service
    #[must_use]
    pub fn tokens(&self) -> TokenApi<'_> {
        TokenApi::new(self)
    }

    /// Access archive data
    #[must_use]
    pub fn data(&self) -> DataApi<'_> {
        DataApi::new(self)
    }

    /// Configured service endpoints
    #[must_use]
    pub fn endpoints(&self) -> &ServiceEndpoints {
        &self.inner.endpoints
    }

    /// Returns true if requests present a client certificate
    #[must_use]
    pub fn presents_identity(&self) -> bool {
        self.inner.presents_identity
    }

    pub(crate) fn http(&self) -> &HttpClient {
        &self.inner.http
    }

    /// `Authorization` header value for HTTP Basic auth
    pub(crate) fn basic_auth_header(credentials: &Credentials) -> String {
        let encoded = B64.encode(format!("{}:{}", credentials.username, credentials.password));
        format!("Basic {encoded}")
    }

    /// Send a request and return the status and body text
    pub(crate) async fn send_text(
        &self,
        request: reqwest::RequestBuilder,
    ) -> std::result::Result<(u16, String), reqwest::Error> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        debug!(status, url = %response.url(), "response received");
        let body = response.text().await?;
        Ok((status, body))
    }
}

/// Builder for configuring a [`CedaClient`]
pub struct CedaClientBuilder {
    endpoints: ServiceEndpoints,
    timeout: Duration,
    user_agent: String,
    identity_pem: Option<Vec<u8>>,
    trust_roots: Vec<Vec<u8>>,
}

impl Default for CedaClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CedaClientBuilder {
    /// Create a new builder pointing at the production services
    #[must_use]
    pub fn new() -> Self {
        Self {
            endpoints: ServiceEndpoints::default(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("ceda-fetch/{}", env!("CARGO_PKG_VERSION")),
            identity_pem: None,
            trust_roots: Vec::new(),
        }
    }

    /// Set the service endpoints (useful for testing)
    #[must_use]
    pub fn endpoints(mut self, endpoints: ServiceEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Present a client certificate on every request.
    ///
    /// `pem` must hold the certificate chain and its private key.
    #[must_use]
    pub fn identity_pem(mut self, pem: Vec<u8>) -> Self {
        self.identity_pem = Some(pem);
        self
    }

    /// Trust an additional CA certificate (PEM) besides the built-in roots
    #[must_use]
    pub fn add_trust_root_pem(mut self, pem: Vec<u8>) -> Self {
        self.trust_roots.push(pem);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<CedaClient> {
        let mut http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(true);

        let presents_identity = self.identity_pem.is_some();
        if let Some(pem) = self.identity_pem {
            let identity = reqwest::Identity::from_pem(&pem)
                .map_err(|e| CedaError::Config(format!("invalid client identity: {e}")))?;
            http = http.identity(identity);
        }

        for pem in &self.trust_roots {
            let cert = reqwest::Certificate::from_pem(pem)
                .map_err(|e| CedaError::Config(format!("invalid trust root: {e}")))?;
            http = http.add_root_certificate(cert);
        }

        let http = http
            .build()
            .map_err(|e| CedaError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(CedaClient {
            inner: Arc::new(ClientInner {
                http,
                endpoints: self.endpoints,
                presents_identity,
            }),
        })
    }
}
