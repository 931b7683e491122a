//! Download token issuance endpoint.

use crate::CedaClient;
use ceda_core::{CedaError, Credentials, IssuedToken, Result, TokenResponse};
use reqwest::header::AUTHORIZATION;
use tracing::{debug, warn};

/// Token service endpoint
pub struct TokenApi<'a> {
    client: &'a CedaClient,
}

impl<'a> TokenApi<'a> {
    pub(crate) fn new(client: &'a CedaClient) -> Self {
        Self { client }
    }

    /// Ask the token service for a new download token.
    ///
    /// Anything other than HTTP 200 with a body holding `access_token` and
    /// `expires` is a [`CedaError::TokenIssuance`].
    pub async fn create(&self, credentials: &Credentials) -> Result<IssuedToken> {
        let url = &self.client.endpoints().token;
        debug!(url = %url, username = %credentials.username, "POST token request");

        let request = self
            .client
            .http()
            .post(url)
            .header(AUTHORIZATION, CedaClient::basic_auth_header(credentials));

        let (status, body) = self
            .client
            .send_text(request)
            .await
            .map_err(|e| CedaError::Http(e.to_string()))?;

        if status != 200 {
            warn!(status, "token service refused the request");
            return Err(CedaError::TokenIssuance {
                status,
                message: "check your username and password".to_string(),
            });
        }

        let response = TokenResponse::parse(&body).map_err(|e| CedaError::TokenIssuance {
            status,
            message: format!("malformed token response: {e}"),
        })?;

        Ok(IssuedToken {
            raw_body: body,
            response,
        })
    }
}
