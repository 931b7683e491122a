//! Short-lived certificate issuance endpoint.

use crate::CedaClient;
use ceda_core::{CedaError, Credentials, Result};
use reqwest::header::AUTHORIZATION;
use tracing::debug;

/// Form field carrying the PEM certificate signing request
const CERT_REQ_FIELD: &str = "certificate_request";

/// Certificate-issuance service endpoint
pub struct CertificateApi<'a> {
    client: &'a CedaClient,
}

impl<'a> CertificateApi<'a> {
    pub(crate) fn new(client: &'a CedaClient) -> Self {
        Self { client }
    }

    /// Submit a PEM certificate signing request and return the signed
    /// certificate chain as PEM.
    pub async fn issue(&self, credentials: &Credentials, csr_pem: &str) -> Result<String> {
        let url = &self.client.endpoints().certificate;
        debug!(url = %url, username = %credentials.username, "POST certificate request");

        let request = self
            .client
            .http()
            .post(url)
            .header(AUTHORIZATION, CedaClient::basic_auth_header(credentials))
            .form(&[(CERT_REQ_FIELD, csr_pem)]);

        let (status, body) = self
            .client
            .send_text(request)
            .await
            .map_err(|e| CedaError::certificate(e.to_string()))?;

        match status {
            200 => {}
            401 | 403 => {
                return Err(CedaError::certificate(format!(
                    "HTTP {status}: check your username and password"
                )))
            }
            _ => return Err(CedaError::certificate(format!("HTTP {status}"))),
        }

        if !body.contains("-----BEGIN CERTIFICATE-----") {
            return Err(CedaError::certificate("response contained no certificate"));
        }

        Ok(body)
    }
}
