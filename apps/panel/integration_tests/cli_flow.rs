use panel::commands::{navigation, session};
use panel::error::PanelError;
use panel::state::AppState;

use session_core::config::PanelConfig;
use session_core::session::VerifyOutcome;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Integration tests: panel commands against a mock panel API
// Each AppState stands in for one CLI invocation.
// ============================================================================

fn save_config(dir: &TempDir, server: &MockServer) {
    let mut config = PanelConfig::default();
    config.api.base_url = format!("{}/api", server.uri());
    config.storage.directory_override = Some(dir.path().join("data"));
    config.save(dir.path()).unwrap();
}

/// **VALUE**: `login`, then `verify` and `status` in later invocations.
///
/// **WHY THIS MATTERS**: This is how the CLI is used. Each command is a new
/// process that only shares the config directory with the previous one.
///
/// **BUG THIS CATCHES**: Would catch the login token not reaching disk, the
/// restored token not being sent as `X-Auth-Token`, or config load ignoring
/// the saved base URL.
#[tokio::test]
async fn given_saved_config_when_login_then_later_runs_are_signed_in() {
    // GIVEN: A mock API and a config pointing at it
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "abc" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/check-auth"))
        .and(header("X-Auth-Token", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    save_config(&dir, &server);

    // WHEN: Logging in
    let first = AppState::load(dir.path()).unwrap();
    let report = session::login(&first, "admin", "admin123").await.unwrap();

    // THEN: Signed in and on the clients page
    assert!(report.authenticated);
    assert_eq!(report.location.as_deref(), Some("/"));
    assert_eq!(report.title, "Antizapret | Clients");

    // AND: A later invocation verifies the same token
    let second = AppState::load(dir.path()).unwrap();
    assert!(session::status(&second).authenticated);
    assert_eq!(session::verify(&second).await, VerifyOutcome::Valid);
}

#[tokio::test]
async fn given_bad_password_when_login_then_core_error_and_signed_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid credentials" })))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    save_config(&dir, &server);
    let state = AppState::load(dir.path()).unwrap();

    let result = session::login(&state, "admin", "wrong").await;

    assert!(matches!(result, Err(PanelError::Core { .. })));
    assert!(!session::status(&state).authenticated);
}

#[tokio::test]
async fn given_stale_token_when_verify_then_next_run_is_signed_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "stale" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/check-auth"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    save_config(&dir, &server);
    session::login(&AppState::load(dir.path()).unwrap(), "admin", "admin123")
        .await
        .unwrap();

    let state = AppState::load(dir.path()).unwrap();
    assert_eq!(session::verify(&state).await, VerifyOutcome::Invalidated);

    let next = AppState::load(dir.path()).unwrap();
    assert!(!session::status(&next).authenticated);
    assert_eq!(navigation::navigate(&next, "/profile").unwrap().path, "/login");
}

#[tokio::test]
async fn given_server_down_when_verify_then_session_survives() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "abc" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/check-auth"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    save_config(&dir, &server);
    let state = AppState::load(dir.path()).unwrap();
    session::login(&state, "admin", "admin123").await.unwrap();

    let outcome = session::verify(&state).await;

    assert_eq!(outcome, VerifyOutcome::Unreachable);
    assert!(session::status(&state).authenticated);
}
