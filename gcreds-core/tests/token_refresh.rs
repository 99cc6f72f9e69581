//! Integration tests for the deferred-refresh token source.
//!
//! These tests verify that the TokenSource:
//! - Returns a fresh cached token without touching the network
//! - Performs the refresh-token exchange when the token is expired
//! - Keeps the prior refresh token when the provider omits a new one
//! - Never writes a refreshed token back to the credential file
//!
//! The token source itself is blocking, so the wiremock endpoint runs on a
//! runtime owned by the test while the exchange happens on the test thread.

use chrono::{Duration, Utc};
use gcreds_core::{Credential, CredentialStore, PrimaryToken, Secret, TokenError, TokenSource};
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Start a mock provider on a background runtime.
fn start_mock_server() -> (tokio::runtime::Runtime, MockServer) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(MockServer::start());
    (rt, server)
}

fn expired_token() -> PrimaryToken {
    PrimaryToken::new(
        "stale-access-token",
        "stored-refresh-token",
        Some(Utc::now() - Duration::hours(1)),
    )
}

#[test]
fn test_fresh_token_skips_network() {
    let (rt, server) = start_mock_server();

    // Nothing may hit the endpoint for a token that is still valid.
    rt.block_on(
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server),
    );

    let token = PrimaryToken::new("a1", "r1", Some(Utc::now() + Duration::hours(1)));
    let mut source =
        TokenSource::with_token_endpoint(token, format!("{}/token", server.uri())).unwrap();

    let got = source.token().unwrap();
    assert_eq!(got.access_token, Secret::new("a1"));
}

#[test]
fn test_expired_token_is_refreshed() {
    let (rt, server) = start_mock_server();

    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("stored-refresh-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "new-access-token",
                "token_type": "Bearer",
                "expires_in": 3600,
                "refresh_token": "rotated-refresh-token"
            })))
            .expect(1)
            .mount(&server),
    );

    let mut source =
        TokenSource::with_token_endpoint(expired_token(), format!("{}/token", server.uri()))
            .unwrap();

    let got = source.token().unwrap();
    assert_eq!(got.access_token, Secret::new("new-access-token"));
    assert_eq!(got.refresh_token, Secret::new("rotated-refresh-token"));
    assert!(got.expires_at.unwrap() > Utc::now());

    // The refreshed token is cached in memory: a second call must not hit
    // the endpoint again (the mock expects exactly one request).
    let again = source.token().unwrap();
    assert_eq!(again.access_token, Secret::new("new-access-token"));
}

#[test]
fn test_absent_expiry_triggers_refresh() {
    let (rt, server) = start_mock_server();

    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "new-access-token",
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server),
    );

    // An unknown expiry counts as expired even though the access token is set.
    let token = PrimaryToken::new("opaque-access-token", "stored-refresh-token", None);
    let mut source =
        TokenSource::with_token_endpoint(token, format!("{}/token", server.uri())).unwrap();

    let got = source.token().unwrap();
    assert_eq!(got.access_token, Secret::new("new-access-token"));
    // No refresh token in the response: the stored one is kept.
    assert_eq!(got.refresh_token, Secret::new("stored-refresh-token"));
}

#[test]
fn test_refresh_failure_surfaces() {
    let (rt, server) = start_mock_server();

    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "Token has been expired or revoked."
            })))
            .mount(&server),
    );

    let mut source =
        TokenSource::with_token_endpoint(expired_token(), format!("{}/token", server.uri()))
            .unwrap();

    let result = source.token();
    assert!(matches!(result, Err(TokenError::RefreshFailed { .. })));
}

#[test]
fn test_refresh_does_not_persist_to_store() {
    let (rt, server) = start_mock_server();

    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "new-access-token",
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .mount(&server),
    );

    let temp_dir = TempDir::new().unwrap();
    let store = CredentialStore::with_path(temp_dir.path().join("docker_credentials.json"));
    store.set_primary_auth(&expired_token()).unwrap();

    let auth = store.get_primary_auth().unwrap();
    let mut source =
        TokenSource::with_token_endpoint(auth.token().clone(), format!("{}/token", server.uri()))
            .unwrap();

    let refreshed = source.token().unwrap();
    assert_eq!(refreshed.access_token, Secret::new("new-access-token"));

    // The file still holds the stale token; persistence is the caller's call.
    let stored = store.get_primary_auth().unwrap();
    assert_eq!(stored.token().access_token, Secret::new("stale-access-token"));

    // An explicit set is what persists the refreshed token.
    store.set_primary_auth(&refreshed).unwrap();
    let stored = store.get_primary_auth().unwrap();
    assert_eq!(stored.token().access_token, Secret::new("new-access-token"));
}

#[test]
fn test_refresh_leaves_other_credentials_untouched() {
    let (rt, server) = start_mock_server();

    rt.block_on(
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "new-access-token",
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .mount(&server),
    );

    let temp_dir = TempDir::new().unwrap();
    let store = CredentialStore::with_path(temp_dir.path().join("docker_credentials.json"));
    store.set_primary_auth(&expired_token()).unwrap();
    store
        .set_other_credentials(Credential::new("https://x", "user", "s"))
        .unwrap();

    let auth = store.get_primary_auth().unwrap();
    let mut source =
        TokenSource::with_token_endpoint(auth.token().clone(), format!("{}/token", server.uri()))
            .unwrap();
    source.token().unwrap();

    assert!(store.get_other_credentials("https://x").is_ok());
}
