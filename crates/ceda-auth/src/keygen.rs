//! Key pair and certificate signing request generation.

use ceda_core::{CedaError, Result};
use rcgen::{CertificateParams, DistinguishedName, DnType, KeyPair, PKCS_RSA_SHA256};

/// A fresh private key and the CSR to send to the certificate service
pub struct CertificateRequest {
    /// PKCS#8 private key (PEM)
    pub key_pem: String,
    /// Certificate signing request (PEM)
    pub csr_pem: String,
}

/// Generate an RSA-2048 key pair and a SHA-256 signed CSR whose subject CN
/// is `common_name`
pub fn generate_request(common_name: &str) -> Result<CertificateRequest> {
    let crypto = |e: rcgen::Error| CedaError::Crypto(e.to_string());

    let key_pair = KeyPair::generate_for(&PKCS_RSA_SHA256).map_err(crypto)?;

    let mut params = CertificateParams::default();
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, common_name);
    params.distinguished_name = dn;

    let csr = params.serialize_request(&key_pair).map_err(crypto)?;

    Ok(CertificateRequest {
        key_pem: key_pair.serialize_pem(),
        csr_pem: csr.pem().map_err(crypto)?,
    })
}
