//! Trust-root distribution endpoint.

use crate::CedaClient;
use base64::{engine::general_purpose::STANDARD as B64, Engine};
use ceda_core::{CedaError, Result, TrustRoot};
use tracing::debug;

/// Trust-root service endpoint
pub struct TrustRootsApi<'a> {
    client: &'a CedaClient,
}

impl<'a> TrustRootsApi<'a> {
    pub(crate) fn new(client: &'a CedaClient) -> Self {
        Self { client }
    }

    /// Download the current set of CA certificates
    pub async fn fetch(&self) -> Result<Vec<TrustRoot>> {
        let url = &self.client.endpoints().trustroots;
        debug!(url = %url, "GET trust roots");

        let (status, body) = self
            .client
            .send_text(self.client.http().get(url))
            .await
            .map_err(|e| CedaError::trust_roots(e.to_string()))?;

        if status != 200 {
            return Err(CedaError::trust_roots(format!("HTTP {status}")));
        }

        parse_trust_roots(&body)
    }
}

/// Parse a trust-root listing: one `<file name>=<base64 content>` per line.
pub fn parse_trust_roots(body: &str) -> Result<Vec<TrustRoot>> {
    let mut roots = Vec::new();

    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let (file_name, encoded) = line
            .split_once('=')
            .ok_or_else(|| CedaError::trust_roots(format!("malformed entry: {line}")))?;

        // Names land inside the trust-roots directory
        if file_name.is_empty()
            || file_name.contains(['/', '\\'])
            || file_name == "."
            || file_name == ".."
        {
            return Err(CedaError::trust_roots(format!(
                "refusing file name {file_name:?}"
            )));
        }

        let content = B64
            .decode(encoded.trim())
            .map_err(|e| CedaError::trust_roots(format!("{file_name}: {e}")))?;

        roots.push(TrustRoot {
            file_name: file_name.to_string(),
            content,
        });
    }

    Ok(roots)
}
