//! Credential lifecycle: reuse what is still valid, refresh what is not.

use crate::certificate::check_certificate;
use crate::keygen::generate_request;
use crate::store;
use crate::{CredentialPaths, CredentialProvider, TokenCache, TokenCacheState};
use ceda_client::{CedaClient, CedaClientBuilder};
use ceda_core::{CedaError, CertificateStatus, Credentials, DownloadToken, Outcome, Result};
use chrono::{Duration, Utc};
use tracing::{debug, info, warn};

/// Keeps one certificate and one download token usable.
///
/// Credentials are only requested from the provider when something has to
/// be refreshed.
pub struct CredentialManager {
    client: CedaClient,
    paths: CredentialPaths,
    provider: Box<dyn CredentialProvider>,
    token_min_lifetime: Duration,
}

impl CredentialManager {
    /// Create a manager using `client` for the credential services
    pub fn new(
        client: CedaClient,
        paths: CredentialPaths,
        provider: impl CredentialProvider + 'static,
    ) -> Self {
        Self {
            client,
            paths,
            provider: Box::new(provider),
            token_min_lifetime: Duration::zero(),
        }
    }

    /// Treat cached tokens expiring within `margin` as expired (default: zero)
    #[must_use]
    pub fn token_min_lifetime(mut self, margin: Duration) -> Self {
        self.token_min_lifetime = margin;
        self
    }

    /// Configured paths
    #[must_use]
    pub fn paths(&self) -> &CredentialPaths {
        &self.paths
    }

    /// Current state of the certificate file
    #[must_use]
    pub fn certificate_status(&self, min_lifetime: Duration) -> CertificateStatus {
        check_certificate(&self.paths.credentials, min_lifetime)
    }

    fn login(&self) -> Result<Credentials> {
        let credentials = self.provider.credentials()?;
        if credentials.is_incomplete() {
            return Err(CedaError::MissingCredentials(
                "username and password are both required".into(),
            ));
        }
        Ok(credentials)
    }

    /// Make sure an in-date certificate, trust roots and the derived client
    /// config are on disk.
    ///
    /// Without `force`, nothing happens if the derived config exists and the
    /// certificate is valid. Otherwise trust roots are bootstrapped, a new
    /// certificate is issued and every file is rewritten.
    pub async fn ensure_certificate(&self, force: bool) -> Result<Outcome> {
        if !force && self.certificate_reusable() {
            info!(path = %self.paths.credentials.display(), "security credentials already set up");
            return Ok(Outcome::Reused);
        }

        let credentials = self.login()?;

        store::ensure_dir(&self.paths.certs_dir).await?;

        let roots = self.client.trust_roots().fetch().await?;
        store::write_trust_roots(&self.paths.trustroots_dir, &roots).await?;

        let request = generate_request(&credentials.username)?;
        let chain = self
            .client
            .certificates()
            .issue(&credentials, &request.csr_pem)
            .await?;
        store::write_credentials(&self.paths.credentials, &chain, &request.key_pem).await?;

        store::write_dodsrc(&self.paths).await?;

        info!(path = %self.paths.credentials.display(), "security credentials set up");
        Ok(Outcome::Refreshed)
    }

    fn certificate_reusable(&self) -> bool {
        if let Some(dodsrc) = &self.paths.dodsrc {
            if !dodsrc.is_file() {
                debug!(path = %dodsrc.display(), "derived client config missing");
                return false;
            }
        }
        match self.certificate_status(Duration::zero()) {
            CertificateStatus::Valid { .. } => true,
            CertificateStatus::Invalid { reason, .. } => {
                debug!(%reason, "certificate needs refreshing");
                false
            }
        }
    }

    /// Return a usable download token, from the cache when possible.
    ///
    /// On refresh the token service response is written to the cache as
    /// received. A refused request leaves the cache untouched.
    pub async fn get_or_refresh_token(&self) -> Result<(DownloadToken, Outcome)> {
        let cache = TokenCache::new(&self.paths.token_cache);

        match cache.load().await {
            TokenCacheState::Cached(token)
                if token.is_usable_at(Utc::now(), self.token_min_lifetime) =>
            {
                info!(token = %token.masked(), expires = %token.expires, "using cached download token");
                return Ok((token, Outcome::Reused));
            }
            TokenCacheState::Cached(token) => {
                debug!(expires = %token.expires, "cached download token expired");
            }
            TokenCacheState::Absent => debug!(path = %cache.path().display(), "no cached download token"),
            TokenCacheState::Corrupt(reason) => {
                warn!(path = %cache.path().display(), %reason, "ignoring unreadable token cache");
            }
        }

        let credentials = self.login()?;
        let issued = self.client.tokens().create(&credentials).await?;
        cache.store_raw(&issued.raw_body).await?;

        let token = DownloadToken::from(issued.response);
        info!(token = %token.masked(), expires = %token.expires, "download token refreshed");
        Ok((token, Outcome::Refreshed))
    }

    /// Build a data client that presents the certificate file as client
    /// identity and also trusts the bootstrapped trust roots.
    pub async fn certificate_client(&self, builder: CedaClientBuilder) -> Result<CedaClient> {
        let identity = tokio::fs::read(&self.paths.credentials)
            .await
            .map_err(|e| CedaError::io(&self.paths.credentials, e))?;

        let mut builder = builder.identity_pem(identity);
        for root in store::load_trust_roots(&self.paths.trustroots_dir).await? {
            builder = builder.add_trust_root_pem(root);
        }
        builder.build()
    }
}
