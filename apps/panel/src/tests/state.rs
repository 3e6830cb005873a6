// Unit tests for AppState wiring and the synchronous commands

use crate::commands::{navigation, session};
use crate::error::PanelError;
use crate::state::AppState;

use session_core::config::PanelConfig;
use session_core::storage::{FileStorage, TokenStorage};

use tempfile::TempDir;

fn offline_config(dir: &TempDir) -> PanelConfig {
    let mut config = PanelConfig::default();
    config.api.base_url = String::from("http://127.0.0.1:9/api");
    config.storage.directory_override = Some(dir.path().to_path_buf());
    config
}

/// **VALUE**: A fresh install starts signed out and the guard keeps it out.
///
/// **WHY THIS MATTERS**: This is the first thing any user sees. The protected
/// settings page must bounce to login, and the title must be the login one.
///
/// **BUG THIS CATCHES**: Would catch the wiring passing a different session to
/// the router than the one the store writes, or titles applied before redirects.
#[test]
fn given_fresh_install_when_navigating_to_settings_then_lands_on_login() {
    // GIVEN: Empty storage
    let dir = TempDir::new().unwrap();
    let state = AppState::new(offline_config(&dir)).unwrap();

    // WHEN: Navigating to a protected route
    let report = navigation::navigate(&state, "/settings").unwrap();

    // THEN: Redirected to login with the login title
    assert_eq!(report.path, "/login");
    assert_eq!(report.redirected_from.as_deref(), Some("/settings"));
    assert_eq!(report.title, "Antizapret | Login");
    assert_eq!(state.title(), "Antizapret | Login");
    assert!(!session::status(&state).authenticated);
}

/// **VALUE**: A token persisted by an earlier run is picked up at startup.
///
/// **WHY THIS MATTERS**: Each CLI invocation is a new process; without restore
/// every command after `login` would act signed out.
///
/// **BUG THIS CATCHES**: Would catch `restore()` being skipped or the storage
/// path differing between runs.
#[test]
fn given_persisted_token_when_starting_then_session_restored() {
    let dir = TempDir::new().unwrap();
    let config = offline_config(&dir);
    let storage_path = config.storage_path().unwrap();
    FileStorage::new(&storage_path).set("token", "from-last-run").unwrap();

    let state = AppState::new(config).unwrap();

    let status = session::status(&state);
    assert!(status.authenticated);
    assert_eq!(status.storage_path.as_deref(), Some(storage_path.as_path()));

    let report = navigation::navigate(&state, "/login").unwrap();
    assert_eq!(report.path, "/");
    assert_eq!(report.title, "Antizapret | Clients");
}

#[test]
fn given_signed_in_when_logout_then_storage_cleared_and_on_login() {
    let dir = TempDir::new().unwrap();
    let config = offline_config(&dir);
    let storage_path = config.storage_path().unwrap();
    FileStorage::new(&storage_path).set("token", "abc").unwrap();
    let state = AppState::new(config).unwrap();

    let report = session::logout(&state);

    assert!(!report.authenticated);
    assert_eq!(report.location.as_deref(), Some("/login"));
    assert_eq!(FileStorage::new(&storage_path).get("token").unwrap(), None);
}

#[test]
fn given_unknown_path_when_navigating_signed_in_then_home() {
    let dir = TempDir::new().unwrap();
    let config = offline_config(&dir);
    FileStorage::new(config.storage_path().unwrap())
        .set("token", "abc")
        .unwrap();
    let state = AppState::new(config).unwrap();

    let report = navigation::navigate(&state, "/no/such/page?x=1").unwrap();

    assert_eq!(report.path, "/");
    assert_eq!(report.redirected_from.as_deref(), Some("/no/such/page"));
}

#[test]
fn given_custom_title_config_when_navigating_then_prefix_used() {
    let dir = TempDir::new().unwrap();
    let mut config = offline_config(&dir);
    config.title.prefix = String::from("VPN");

    let state = AppState::new(config).unwrap();
    navigation::navigate(&state, "/login").unwrap();

    assert_eq!(state.title(), "VPN | Login");
}

#[test]
fn given_invalid_config_when_building_state_then_core_error() {
    let dir = TempDir::new().unwrap();
    let mut config = offline_config(&dir);
    config.api.timeout_secs = 0;

    let result = AppState::new(config);

    assert!(matches!(result, Err(PanelError::Core { .. })));
}

#[test]
fn given_login_path_missing_from_route_table_when_building_state_then_core_error() {
    let dir = TempDir::new().unwrap();
    let mut config = offline_config(&dir);
    config.navigation.login_path = String::from("/signin");

    let result = AppState::new(config);

    let Err(PanelError::Core { message, .. }) = result else {
        panic!("expected a Core error for an unroutable login path");
    };
    assert!(message.contains("/signin"), "{message}");
}

#[test]
fn given_default_table_when_listing_routes_then_login_is_guest_only() {
    let dir = TempDir::new().unwrap();
    let state = AppState::new(offline_config(&dir)).unwrap();

    let routes = navigation::routes(&state);

    let login = routes.iter().find(|route| route.path == "/login").unwrap();
    assert!(login.guest_only);
    assert!(!login.requires_auth);
    assert_eq!(login.title.as_deref(), Some("Login"));
    assert!(routes.iter().any(|route| route.redirect.as_deref() == Some("/")));
}
