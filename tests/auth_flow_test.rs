//! Integration tests for the credential lifecycle: first-run consent,
//! code exchange, persistence, and reuse by a later process

use std::io::Cursor;

use gmail_console::auth::{AuthStatus, CredentialStore};
use gmail_console::config::Config;
use gmail_console::error::GmailError;
use gmail_console::shell;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config() -> Config {
    Config {
        client_id: "test-client-id".to_string(),
        client_secret: "test-secret".to_string(),
        redirect_uri: "http://localhost:8080".to_string(),
    }
}

fn token_response() -> serde_json::Value {
    json!({
        "access_token": "ya29.fresh",
        "expires_in": 3599,
        "refresh_token": "1//refresh",
        "scope": "https://www.googleapis.com/auth/gmail.modify",
        "token_type": "Bearer"
    })
}

#[tokio::test]
async fn first_run_consent_then_exchange_then_reuse() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let token_path = dir.path().join("token.json");

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=validcode"))
        .and(body_string_contains("client_id=test-client-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response()))
        .expect(1)
        .mount(&server)
        .await;

    // First run: no token file, consent required
    let mut store = CredentialStore::new(test_config(), &token_path)
        .unwrap()
        .with_token_endpoint(format!("{}/token", server.uri()));
    match store.ensure_authenticated().await.unwrap() {
        AuthStatus::ConsentRequired { auth_url } => {
            assert!(auth_url.contains("client_id=test-client-id"));
            assert!(auth_url.contains("response_type=code"));
        }
        AuthStatus::Authorized => panic!("Expected ConsentRequired on first run"),
    }

    store.complete_authorization("validcode").await.unwrap();
    assert_eq!(store.access_token(), Some("ya29.fresh"));
    assert!(token_path.exists());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&token_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    // A second store (a later process) picks the token up from disk
    let mut second = CredentialStore::new(test_config(), &token_path).unwrap();
    assert_eq!(
        second.ensure_authenticated().await.unwrap(),
        AuthStatus::Authorized
    );
    assert_eq!(second.access_token(), Some("ya29.fresh"));
}

#[tokio::test]
async fn exchange_overwrites_existing_token_file() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let token_path = dir.path().join("token.json");
    tokio::fs::write(
        &token_path,
        json!({"access_token": "ya29.stale"}).to_string(),
    )
    .await
    .unwrap();

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response()))
        .mount(&server)
        .await;

    let mut store = CredentialStore::new(test_config(), &token_path)
        .unwrap()
        .with_token_endpoint(format!("{}/token", server.uri()));
    store.complete_authorization("newcode").await.unwrap();

    let on_disk = tokio::fs::read_to_string(&token_path).await.unwrap();
    assert!(on_disk.contains("ya29.fresh"));
    assert!(!on_disk.contains("ya29.stale"));
}

#[tokio::test]
async fn provider_rejection_fails_without_writing_a_file() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let token_path = dir.path().join("token.json");

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})),
        )
        .mount(&server)
        .await;

    let mut store = CredentialStore::new(test_config(), &token_path)
        .unwrap()
        .with_token_endpoint(format!("{}/token", server.uri()));

    let err = store.complete_authorization("badcode").await.unwrap_err();
    assert!(matches!(err, GmailError::AuthError(_)));
    assert!(format!("{}", err).contains("invalid_grant"));
    assert!(!token_path.exists());
    assert!(store.access_token().is_none());
}

#[tokio::test]
async fn unreachable_token_endpoint_is_a_network_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = CredentialStore::new(test_config(), dir.path().join("token.json"))
        .unwrap()
        .with_token_endpoint("http://127.0.0.1:1/token");

    let err = store.complete_authorization("code").await.unwrap_err();
    assert!(matches!(err, GmailError::NetworkError(_)), "got {:?}", err);
}

#[tokio::test]
async fn shell_authenticate_prompts_and_completes_exchange() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let token_path = dir.path().join("token.json");

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("code=pasted-code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response()))
        .expect(1)
        .mount(&server)
        .await;

    let mut store = CredentialStore::new(test_config(), &token_path)
        .unwrap()
        .with_token_endpoint(format!("{}/token", server.uri()));

    let mut input = Cursor::new(b"pasted-code\n".to_vec());
    let mut output = Vec::new();
    let authenticated = shell::authenticate(&mut store, &mut input, &mut output)
        .await
        .unwrap();

    assert!(authenticated);
    let out = String::from_utf8(output).unwrap();
    assert!(out.contains("Authorize this app by visiting this url:"));
    assert!(out.contains("Token stored successfully"));
    assert!(token_path.exists());
}

#[tokio::test]
async fn shell_authenticate_fails_on_rejected_code() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})),
        )
        .mount(&server)
        .await;

    let mut store = CredentialStore::new(test_config(), dir.path().join("token.json"))
        .unwrap()
        .with_token_endpoint(format!("{}/token", server.uri()));

    let mut input = Cursor::new(b"bad-code\n".to_vec());
    let mut output = Vec::new();
    let authenticated = shell::authenticate(&mut store, &mut input, &mut output)
        .await
        .unwrap();

    assert!(!authenticated);
    let out = String::from_utf8(output).unwrap();
    assert!(out.contains("Error retrieving access token"));
}

#[tokio::test]
async fn shell_authenticate_skips_prompt_with_existing_token() {
    let dir = tempfile::tempdir().unwrap();
    let token_path = dir.path().join("token.json");
    tokio::fs::write(&token_path, token_response().to_string())
        .await
        .unwrap();

    let mut store = CredentialStore::new(test_config(), &token_path).unwrap();

    // No input available; must not be needed
    let mut input = Cursor::new(Vec::new());
    let mut output = Vec::new();
    let authenticated = shell::authenticate(&mut store, &mut input, &mut output)
        .await
        .unwrap();

    assert!(authenticated);
    assert!(String::from_utf8(output)
        .unwrap()
        .contains("Using existing authentication token"));
}
