#![allow(dead_code)]

use base64::{engine::general_purpose::STANDARD as B64, Engine};
use ceda_auth::CredentialPaths;
use ceda_client::{CedaClient, ServiceEndpoints};
use wiremock::MockServer;

/// Self-signed certificate valid from `now + from_secs` to `now + to_secs`.
/// Returns `(certificate PEM, private key PEM)`.
pub fn certificate(from_secs: i64, to_secs: i64) -> (String, String) {
    let now = time::OffsetDateTime::now_utc();
    let key = rcgen::KeyPair::generate().unwrap();
    let mut params = rcgen::CertificateParams::new(vec!["jdoe".to_string()]).unwrap();
    params.not_before = now + time::Duration::seconds(from_secs);
    params.not_after = now + time::Duration::seconds(to_secs);
    let cert = params.self_signed(&key).unwrap();
    (cert.pem(), key.serialize_pem())
}

/// Put an existing credential file (and optionally the derived config) in place
pub fn install_certificate(paths: &CredentialPaths, from_secs: i64, to_secs: i64, dodsrc: bool) {
    let (cert, key) = certificate(from_secs, to_secs);
    std::fs::create_dir_all(&paths.certs_dir).unwrap();
    std::fs::write(&paths.credentials, format!("{cert}{key}")).unwrap();
    if dodsrc {
        if let Some(path) = &paths.dodsrc {
            std::fs::write(path, "HTTP.COOKIEJAR=./dods_cookies\n").unwrap();
        }
    }
}

/// Trust-root listing with a single CA
pub fn trust_roots_body() -> String {
    let (ca, _) = certificate(-3600, 86_400);
    format!("ceda-ca.0={}\n", B64.encode(ca))
}

pub fn client_for(server: &MockServer) -> CedaClient {
    CedaClient::builder()
        .endpoints(ServiceEndpoints::with_base(&server.uri()))
        .build()
        .unwrap()
}
