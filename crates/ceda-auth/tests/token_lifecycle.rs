mod common;

use ceda_auth::{CredentialManager, CredentialPaths, CredentialProvider};
use ceda_core::{CedaError, Credentials, Outcome, Result};
use chrono::{DateTime, Duration, Utc};
use common::client_for;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FRESH_BODY: &str =
    r#"{"access_token":"abc123def456ghi789","expires":"2099-01-01T00:00:00.000000+00:00"}"#;
const EXPIRED_BODY: &str = r#"{"access_token":"old","expires":"2000-01-01T00:00:00.000000+00:00"}"#;

/// Fails the test if the manager asks for a login
struct NoLogin;

impl CredentialProvider for NoLogin {
    fn credentials(&self) -> Result<Credentials> {
        Err(CedaError::MissingCredentials("login must not be requested".into()))
    }
}

fn creds() -> Credentials {
    Credentials::new("jdoe", "s3cret")
}

async fn token_endpoint(server: &MockServer, status: u16, body: &str, calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/token/create/"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .expect(calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn fresh_environment_fetches_and_caches() {
    let server = MockServer::start().await;
    token_endpoint(&server, 200, FRESH_BODY, 1).await;

    let dir = tempfile::tempdir().unwrap();
    let paths = CredentialPaths::in_dir(dir.path());
    let manager = CredentialManager::new(client_for(&server), paths.clone(), creds());

    let (token, outcome) = manager.get_or_refresh_token().await.unwrap();

    assert_eq!(outcome, Outcome::Refreshed);
    assert_eq!(token.access_token, "abc123def456ghi789");
    assert_eq!(
        token.expires,
        DateTime::parse_from_rfc3339("2099-01-01T00:00:00+00:00").unwrap()
    );
    assert_eq!(std::fs::read_to_string(&paths.token_cache).unwrap(), FRESH_BODY);
}

#[tokio::test]
async fn valid_cache_makes_no_requests() {
    let server = MockServer::start().await;
    token_endpoint(&server, 200, FRESH_BODY, 0).await;

    let dir = tempfile::tempdir().unwrap();
    let paths = CredentialPaths::in_dir(dir.path());
    let cached = r#"{"access_token":"cached-token-value","expires":"2099-06-01T00:00:00.000000+00:00"}"#;
    std::fs::write(&paths.token_cache, cached).unwrap();

    let manager = CredentialManager::new(client_for(&server), paths.clone(), NoLogin);
    let (token, outcome) = manager.get_or_refresh_token().await.unwrap();

    assert_eq!(outcome, Outcome::Reused);
    assert_eq!(token.access_token, "cached-token-value");
    assert_eq!(std::fs::read_to_string(&paths.token_cache).unwrap(), cached);
}

#[tokio::test]
async fn expired_cache_is_refreshed_once() {
    let server = MockServer::start().await;
    token_endpoint(&server, 200, FRESH_BODY, 1).await;

    let dir = tempfile::tempdir().unwrap();
    let paths = CredentialPaths::in_dir(dir.path());
    std::fs::write(&paths.token_cache, EXPIRED_BODY).unwrap();

    let manager = CredentialManager::new(client_for(&server), paths.clone(), creds());
    let (token, outcome) = manager.get_or_refresh_token().await.unwrap();

    assert_eq!(outcome, Outcome::Refreshed);
    assert_eq!(token.access_token, "abc123def456ghi789");
    assert_eq!(std::fs::read_to_string(&paths.token_cache).unwrap(), FRESH_BODY);
}

#[tokio::test]
async fn corrupt_cache_is_treated_as_absent() {
    let server = MockServer::start().await;
    token_endpoint(&server, 200, FRESH_BODY, 1).await;

    let dir = tempfile::tempdir().unwrap();
    let paths = CredentialPaths::in_dir(dir.path());
    std::fs::write(&paths.token_cache, "{\"access_token\": truncated").unwrap();

    let manager = CredentialManager::new(client_for(&server), paths.clone(), creds());
    let (_, outcome) = manager.get_or_refresh_token().await.unwrap();

    assert_eq!(outcome, Outcome::Refreshed);
    assert_eq!(std::fs::read_to_string(&paths.token_cache).unwrap(), FRESH_BODY);
}

#[tokio::test]
async fn refused_issuance_leaves_cache_alone() {
    let server = MockServer::start().await;
    token_endpoint(&server, 401, r#"{"detail":"Invalid credentials"}"#, 1).await;

    let dir = tempfile::tempdir().unwrap();
    let paths = CredentialPaths::in_dir(dir.path());
    std::fs::write(&paths.token_cache, EXPIRED_BODY).unwrap();

    let manager = CredentialManager::new(client_for(&server), paths.clone(), creds());
    let err = manager.get_or_refresh_token().await.unwrap_err();

    assert!(matches!(err, CedaError::TokenIssuance { status: 401, .. }));
    assert_eq!(std::fs::read_to_string(&paths.token_cache).unwrap(), EXPIRED_BODY);
}

#[tokio::test]
async fn refused_issuance_creates_no_cache() {
    let server = MockServer::start().await;
    token_endpoint(&server, 401, "", 1).await;

    let dir = tempfile::tempdir().unwrap();
    let paths = CredentialPaths::in_dir(dir.path());

    let manager = CredentialManager::new(client_for(&server), paths.clone(), creds());
    assert!(manager.get_or_refresh_token().await.is_err());
    assert!(!paths.token_cache.exists());
}

#[tokio::test]
async fn missing_login_stops_before_network() {
    let server = MockServer::start().await;
    token_endpoint(&server, 200, FRESH_BODY, 0).await;

    let dir = tempfile::tempdir().unwrap();
    let manager = CredentialManager::new(
        client_for(&server),
        CredentialPaths::in_dir(dir.path()),
        Credentials::new("jdoe", ""),
    );

    let err = manager.get_or_refresh_token().await.unwrap_err();
    assert!(matches!(err, CedaError::MissingCredentials(_)));
}

#[tokio::test]
async fn token_margin_forces_early_refresh() {
    let server = MockServer::start().await;
    token_endpoint(&server, 200, FRESH_BODY, 1).await;

    let dir = tempfile::tempdir().unwrap();
    let paths = CredentialPaths::in_dir(dir.path());
    let soon = (Utc::now() + Duration::seconds(30)).to_rfc3339();
    std::fs::write(
        &paths.token_cache,
        format!(r#"{{"access_token":"nearly-expired","expires":"{soon}"}}"#),
    )
    .unwrap();

    let manager = CredentialManager::new(client_for(&server), paths, creds())
        .token_min_lifetime(Duration::minutes(5));
    let (token, outcome) = manager.get_or_refresh_token().await.unwrap();

    assert_eq!(outcome, Outcome::Refreshed);
    assert_eq!(token.access_token, "abc123def456ghi789");
}

#[tokio::test]
async fn zero_margin_reuses_token_close_to_expiry() {
    let server = MockServer::start().await;
    token_endpoint(&server, 200, FRESH_BODY, 0).await;

    let dir = tempfile::tempdir().unwrap();
    let paths = CredentialPaths::in_dir(dir.path());
    let soon = (Utc::now() + Duration::seconds(60)).to_rfc3339();
    std::fs::write(
        &paths.token_cache,
        format!(r#"{{"access_token":"nearly-expired","expires":"{soon}"}}"#),
    )
    .unwrap();

    let manager = CredentialManager::new(client_for(&server), paths, NoLogin);
    let (token, outcome) = manager.get_or_refresh_token().await.unwrap();

    assert_eq!(outcome, Outcome::Reused);
    assert_eq!(token.access_token, "nearly-expired");
}
