use crate::helpers::{empty_storage, storage_with_token, wire, wire_with_timeout};

use session_core::error::SessionError;
use session_core::session::VerifyOutcome;
use session_core::storage::FileStorage;
use session_core::transport::Credentials;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Integration tests: session store + router + HTTP transport together
// ============================================================================

/// **VALUE**: The full sign-in flow from the login view to the clients page.
///
/// **WHY THIS MATTERS**: Each piece can be right on its own and still be wired
/// wrong; this checks the store navigates through the real router with the
/// freshly stored token.
///
/// **BUG THIS CATCHES**: Would catch navigation happening before `set_token`
/// (the guard would bounce the user back to login).
#[tokio::test]
async fn given_login_view_when_login_succeeds_then_lands_on_clients() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "abc" })))
        .mount(&server)
        .await;
    let wired = wire(&server, empty_storage());

    assert_eq!(wired.router.push("/").unwrap().path, "/login");

    wired
        .store
        .login(&Credentials::new("admin", "admin123"))
        .await
        .unwrap();

    assert!(wired.state.is_authenticated());
    assert_eq!(wired.router.current().as_deref(), Some("/"));
    assert_eq!(wired.title.get(), "Antizapret | Clients");
    assert_eq!(wired.router.history(), vec!["/login", "/"]);
}

#[tokio::test]
async fn given_wrong_password_when_login_then_stays_on_login_with_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    let wired = wire(&server, empty_storage());
    wired.router.push("/login").unwrap();

    let err = wired
        .store
        .login(&Credentials::new("admin", "nope"))
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::LoginRejected { .. }), "{err:?}");
    assert!(wired.state.token().is_none());
    assert_eq!(wired.router.current().as_deref(), Some("/login"));
}

#[tokio::test]
async fn given_no_token_when_verify_then_server_never_called() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/check-auth"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let wired = wire(&server, empty_storage());

    assert_eq!(wired.store.verify().await, VerifyOutcome::Skipped);
}

/// **VALUE**: A server-side secret change logs a restored session out on verify.
///
/// **WHY THIS MATTERS**: A token persisted last week may no longer be valid; the
/// user must end up on the login view, not on a panel full of 401s.
///
/// **BUG THIS CATCHES**: Would catch `verify` ignoring 401 or not navigating.
#[tokio::test]
async fn given_restored_token_when_verify_gets_401_then_logged_out_to_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/check-auth"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Unauthorized" })))
        .expect(1)
        .mount(&server)
        .await;
    let storage = storage_with_token("old-secret");
    let wired = wire(&server, storage.clone());
    wired.router.push("/settings").unwrap();

    let outcome = wired.store.verify().await;

    assert_eq!(outcome, VerifyOutcome::Invalidated);
    assert!(wired.state.token().is_none());
    assert!(storage.get("token").unwrap().is_none());
    assert_eq!(wired.router.current().as_deref(), Some("/login"));
    assert_eq!(wired.title.get(), "Antizapret | Login");
}

#[tokio::test]
async fn given_server_error_when_verify_then_session_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/check-auth"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let wired = wire(&server, storage_with_token("abc"));

    assert_eq!(wired.store.verify().await, VerifyOutcome::Unreachable);
    assert_eq!(wired.state.token().unwrap().expose(), "abc");
}

#[tokio::test]
async fn given_slow_server_when_verify_times_out_then_session_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/check-auth"))
        .respond_with(ResponseTemplate::new(401).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;
    let wired = wire_with_timeout(&server, storage_with_token("abc"), Duration::from_millis(200));

    assert_eq!(wired.store.verify().await, VerifyOutcome::Unreachable);
    assert!(wired.state.is_authenticated());
}

/// **VALUE**: A login survives a restart through the file store, a logout doesn't.
///
/// **WHY THIS MATTERS**: This is the reload contract: the key is written on login
/// and removed on logout, and restore reads exactly that.
///
/// **BUG THIS CATCHES**: Would catch logout clearing memory but not the file.
#[tokio::test]
async fn given_file_storage_when_restarting_then_session_follows_login_and_logout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "persisted" })))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let storage_path = dir.path().join("storage.json");

    let first_run = wire(&server, Arc::new(FileStorage::new(&storage_path)));
    first_run
        .store
        .login(&Credentials::new("admin", "admin123"))
        .await
        .unwrap();

    let second_run = wire(&server, Arc::new(FileStorage::new(&storage_path)));
    assert_eq!(second_run.state.token().unwrap().expose(), "persisted");
    assert_eq!(second_run.router.push("/profile").unwrap().path, "/profile");

    second_run.store.logout();
    assert_eq!(second_run.router.current().as_deref(), Some("/login"));

    let third_run = wire(&server, Arc::new(FileStorage::new(&storage_path)));
    assert!(!third_run.state.is_authenticated());
    assert_eq!(third_run.router.push("/profile").unwrap().path, "/login");
}
