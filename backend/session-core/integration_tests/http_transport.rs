use crate::helpers::{api_base, empty_storage, storage_with_token};

use session_core::session::SessionState;
use session_core::transport::{AuthTransport, Credentials, HttpTransport};

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Public API tests for HttpTransport against a mock panel API
// ============================================================================

/// **VALUE**: Verifies the login call sends the documented body and parses the token.
///
/// **WHY THIS MATTERS**: The wire format is the contract with the server. A
/// renamed field means nobody can log in.
///
/// **BUG THIS CATCHES**: Would catch `Credentials` serializing extra or renamed
/// fields, or the base URL losing its `/api` segment on join.
#[tokio::test]
async fn given_valid_credentials_when_login_then_posts_json_and_returns_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({ "username": "admin", "password": "admin123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "abc" })))
        .expect(1)
        .mount(&server)
        .await;

    let state = Arc::new(SessionState::new(empty_storage()));
    let transport = HttpTransport::new(&api_base(&server), state).unwrap();

    let response = transport
        .login(&Credentials::new("admin", "admin123"))
        .await
        .unwrap();

    assert_eq!(response.token, "abc");
}

#[tokio::test]
async fn given_rejected_credentials_when_login_then_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid credentials" })))
        .mount(&server)
        .await;

    let state = Arc::new(SessionState::new(empty_storage()));
    let transport = HttpTransport::new(&api_base(&server), state).unwrap();

    let err = transport
        .login(&Credentials::new("admin", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(401));
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn given_non_json_success_body_when_login_then_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy page</html>"))
        .mount(&server)
        .await;

    let state = Arc::new(SessionState::new(empty_storage()));
    let transport = HttpTransport::new(&api_base(&server), state).unwrap();

    let err = transport
        .login(&Credentials::new("admin", "admin123"))
        .await
        .unwrap_err();

    assert_eq!(err.error_category(), "decode");
}

/// **VALUE**: Verifies the current token rides along on every prepared request.
///
/// **WHY THIS MATTERS**: The server authenticates every API call by this header.
/// Without it, every page after login would fail with 401 and log the user out.
///
/// **BUG THIS CATCHES**: Would catch the header being read once at construction
/// instead of from the session on each request.
#[tokio::test]
async fn given_token_in_session_when_requesting_then_auth_header_attached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/check-auth"))
        .and(header("X-Auth-Token", "abc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .and(header("X-Auth-Token", "rotated"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let state = Arc::new(SessionState::new(storage_with_token("abc")));
    state.restore();
    let transport = HttpTransport::new(&api_base(&server), state.clone()).unwrap();

    assert!(transport.check_auth().await.is_ok());

    state.set_token(Some("rotated")).unwrap();
    let response = transport
        .request(Method::GET, "clients")
        .unwrap()
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}

#[tokio::test]
async fn given_no_token_when_requesting_then_no_auth_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/check-auth"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let state = Arc::new(SessionState::new(empty_storage()));
    let transport = HttpTransport::new(&api_base(&server), state).unwrap();

    let err = transport.check_auth().await.unwrap_err();
    assert!(err.is_unauthorized());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("x-auth-token"));
}

#[tokio::test]
async fn given_slow_server_when_check_auth_then_timeout_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/check-auth"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let state = Arc::new(SessionState::new(storage_with_token("abc")));
    state.restore();
    let transport =
        HttpTransport::with_options(&api_base(&server), state, "X-Auth-Token", Duration::from_millis(200)).unwrap();

    let err = transport.check_auth().await.unwrap_err();

    assert!(!err.is_unauthorized());
    assert_eq!(err.error_category(), "timeout");
}

#[test]
fn given_invalid_base_url_when_constructing_then_url_parse_error() {
    let state = Arc::new(SessionState::new(empty_storage()));

    let result = HttpTransport::new("not a url", state);

    assert!(result.is_err());
}

#[test]
fn given_base_url_without_trailing_slash_when_constructing_then_slash_added() {
    let state = Arc::new(SessionState::new(empty_storage()));

    let transport = HttpTransport::new("http://127.0.0.1:8080/api", state).unwrap();

    assert_eq!(transport.base_url().as_str(), "http://127.0.0.1:8080/api/");
}
