mod common;

use ceda_auth::{is_certificate_valid, CredentialManager, CredentialPaths};
use ceda_client::CedaClient;
use ceda_core::{CedaError, Credentials, Outcome};
use chrono::Duration;
use common::{certificate, client_for, install_certificate, trust_roots_body};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn creds() -> Credentials {
    Credentials::new("jdoe", "s3cret")
}

/// Mount both certificate services, each expected `calls` times
async fn certificate_services(server: &MockServer, calls: u64) {
    Mock::given(method("GET"))
        .and(path("/onlineca/trustroots/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(trust_roots_body()))
        .expect(calls)
        .mount(server)
        .await;

    let (issued, _) = certificate(-60, 12 * 3600);
    Mock::given(method("POST"))
        .and(path("/onlineca/certificate/"))
        .and(body_string_contains("certificate_request="))
        .respond_with(ResponseTemplate::new(200).set_body_string(issued))
        .expect(calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn first_setup_writes_everything() {
    let server = MockServer::start().await;
    certificate_services(&server, 1).await;

    let dir = tempfile::tempdir().unwrap();
    let paths = CredentialPaths::in_dir(dir.path());
    let manager = CredentialManager::new(client_for(&server), paths.clone(), creds());

    assert_eq!(manager.ensure_certificate(false).await.unwrap(), Outcome::Refreshed);

    let pem = std::fs::read_to_string(&paths.credentials).unwrap();
    assert!(pem.contains("BEGIN CERTIFICATE"));
    assert!(pem.contains("PRIVATE KEY"));
    assert!(is_certificate_valid(&paths.credentials, Duration::zero()));
    assert!(paths.trustroots_dir.join("ceda-ca.0").is_file());

    let dodsrc = std::fs::read_to_string(paths.dodsrc.as_ref().unwrap()).unwrap();
    assert_eq!(dodsrc.lines().count(), 4);
    assert!(dodsrc.contains(&format!("HTTP.SSL.CAPATH={}", paths.trustroots_dir.display())));
}

#[tokio::test]
async fn second_setup_reuses() {
    let server = MockServer::start().await;
    certificate_services(&server, 1).await;

    let dir = tempfile::tempdir().unwrap();
    let manager = CredentialManager::new(
        client_for(&server),
        CredentialPaths::in_dir(dir.path()),
        creds(),
    );

    assert_eq!(manager.ensure_certificate(false).await.unwrap(), Outcome::Refreshed);
    assert_eq!(manager.ensure_certificate(false).await.unwrap(), Outcome::Reused);
}

#[tokio::test]
async fn force_refresh_contacts_services() {
    let server = MockServer::start().await;
    certificate_services(&server, 1).await;

    let dir = tempfile::tempdir().unwrap();
    let paths = CredentialPaths::in_dir(dir.path());
    install_certificate(&paths, -60, 6 * 3600, true);
    let before = std::fs::read_to_string(&paths.credentials).unwrap();

    let manager = CredentialManager::new(client_for(&server), paths.clone(), creds());
    assert_eq!(manager.ensure_certificate(true).await.unwrap(), Outcome::Refreshed);

    let after = std::fs::read_to_string(&paths.credentials).unwrap();
    assert_ne!(before, after);
}

#[tokio::test]
async fn expired_certificate_is_replaced() {
    let server = MockServer::start().await;
    certificate_services(&server, 1).await;

    let dir = tempfile::tempdir().unwrap();
    let paths = CredentialPaths::in_dir(dir.path());
    install_certificate(&paths, -7200, -3600, true);
    assert!(!is_certificate_valid(&paths.credentials, Duration::zero()));

    let manager = CredentialManager::new(client_for(&server), paths.clone(), creds());
    assert_eq!(manager.ensure_certificate(false).await.unwrap(), Outcome::Refreshed);
    assert!(is_certificate_valid(&paths.credentials, Duration::zero()));
}

#[tokio::test]
async fn missing_marker_forces_refresh() {
    let server = MockServer::start().await;
    certificate_services(&server, 1).await;

    let dir = tempfile::tempdir().unwrap();
    let paths = CredentialPaths::in_dir(dir.path());
    install_certificate(&paths, -60, 6 * 3600, false);

    let manager = CredentialManager::new(client_for(&server), paths.clone(), creds());
    assert_eq!(manager.ensure_certificate(false).await.unwrap(), Outcome::Refreshed);
    assert!(paths.dodsrc.as_ref().unwrap().is_file());
}

#[tokio::test]
async fn markerless_layout_checks_certificate_only() {
    let server = MockServer::start().await;
    certificate_services(&server, 0).await;

    let dir = tempfile::tempdir().unwrap();
    let paths = CredentialPaths::in_dir(dir.path()).without_dodsrc();
    install_certificate(&paths, -60, 6 * 3600, false);

    let manager = CredentialManager::new(client_for(&server), paths, creds());
    assert_eq!(manager.ensure_certificate(false).await.unwrap(), Outcome::Reused);
    assert!(!dir.path().join(".dodsrc").exists());
}

#[tokio::test]
async fn valid_setup_makes_no_requests_and_needs_no_login() {
    let server = MockServer::start().await;
    certificate_services(&server, 0).await;

    let dir = tempfile::tempdir().unwrap();
    let paths = CredentialPaths::in_dir(dir.path());
    install_certificate(&paths, -60, 6 * 3600, true);

    let manager = CredentialManager::new(client_for(&server), paths, Credentials::new("", ""));
    assert_eq!(manager.ensure_certificate(false).await.unwrap(), Outcome::Reused);
}

#[tokio::test]
async fn missing_login_stops_before_network() {
    let server = MockServer::start().await;
    certificate_services(&server, 0).await;

    let dir = tempfile::tempdir().unwrap();
    let manager = CredentialManager::new(
        client_for(&server),
        CredentialPaths::in_dir(dir.path()),
        Credentials::new("", "s3cret"),
    );

    let err = manager.ensure_certificate(false).await.unwrap_err();
    assert!(matches!(err, CedaError::MissingCredentials(_)));
}

#[tokio::test]
async fn rejected_login_is_a_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/onlineca/trustroots/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(trust_roots_body()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/onlineca/certificate/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let paths = CredentialPaths::in_dir(dir.path());
    let manager = CredentialManager::new(client_for(&server), paths.clone(), creds());

    let err = manager.ensure_certificate(false).await.unwrap_err();
    assert!(matches!(
        err,
        CedaError::CredentialService {
            service: "certificate",
            ..
        }
    ));
    assert!(!paths.credentials.exists());
    assert!(!paths.dodsrc.as_ref().unwrap().exists());
}

#[tokio::test]
async fn trust_root_outage_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/onlineca/trustroots/"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/onlineca/certificate/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let manager = CredentialManager::new(
        client_for(&server),
        CredentialPaths::in_dir(dir.path()),
        creds(),
    );

    let err = manager.ensure_certificate(false).await.unwrap_err();
    assert!(matches!(
        err,
        CedaError::CredentialService {
            service: "trust-root",
            ..
        }
    ));
}

#[tokio::test]
async fn certificate_client_requires_credentials_file() {
    let dir = tempfile::tempdir().unwrap();
    let manager = CredentialManager::new(
        CedaClient::new().unwrap(),
        CredentialPaths::in_dir(dir.path()),
        creds(),
    );

    let err = manager
        .certificate_client(CedaClient::builder())
        .await
        .err()
        .unwrap();
    assert!(matches!(err, CedaError::Io { .. }));
}
