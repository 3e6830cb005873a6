// Unit tests for SessionState: token ownership, persistence and the derived flag

use crate::session::{DEFAULT_TOKEN_KEY, SessionState};
use crate::storage::{MemoryStorage, TokenStorage};

use std::sync::Arc;

/// **VALUE**: Verifies the authenticated flag tracks every `set_token` immediately.
///
/// **WHY THIS MATTERS**: The guard reads the flag on every navigation. A flag
/// snapshotted before a later `set_token` would let a logged-out user through
/// a protected route.
///
/// **BUG THIS CATCHES**: Would catch the flag being cached in a field that
/// `set_token` forgets to update.
#[test]
fn given_set_token_when_reading_flag_then_reflects_latest_value() {
    let session = SessionState::new(Arc::new(MemoryStorage::new()));
    assert!(!session.is_authenticated());

    session.set_token(Some("abc")).unwrap();
    assert!(session.is_authenticated());

    session.set_token(None).unwrap();
    assert!(!session.is_authenticated());

    session.set_token(Some("def")).unwrap();
    assert!(session.is_authenticated());
    assert_eq!(session.token().unwrap().expose(), "def");
}

/// **VALUE**: Verifies an empty token is the same as no token, in memory and in storage.
///
/// **WHY THIS MATTERS**: A server bug returning `""` must not leave a session
/// that looks present to storage but absent to the guard.
///
/// **BUG THIS CATCHES**: Would catch `Some("")` being written to storage.
#[test]
fn given_empty_token_when_set_then_treated_as_absent() {
    let storage = Arc::new(MemoryStorage::with_entry(DEFAULT_TOKEN_KEY, "old"));
    let session = SessionState::new(storage.clone());
    session.restore();

    session.set_token(Some("")).unwrap();

    assert!(!session.is_authenticated());
    assert!(session.token().is_none());
    assert!(!storage.contains(DEFAULT_TOKEN_KEY));
}

/// **VALUE**: Verifies set/clear go through to storage and `restore` sees the result.
///
/// **WHY THIS MATTERS**: The session must survive a reload after login and must
/// NOT survive a reload after logout.
///
/// **BUG THIS CATCHES**: Would catch `set_token(None)` clearing memory but
/// leaving the persisted value behind.
#[test]
fn given_cleared_token_when_restoring_new_session_then_finds_nothing() {
    let storage = Arc::new(MemoryStorage::new());

    let first = SessionState::new(storage.clone());
    first.set_token(Some("abc")).unwrap();
    assert_eq!(storage.get(DEFAULT_TOKEN_KEY).unwrap().as_deref(), Some("abc"));

    let reloaded = SessionState::new(storage.clone());
    assert!(reloaded.restore(), "persisted token should be restored");
    assert!(reloaded.is_authenticated());

    reloaded.set_token(None).unwrap();
    assert!(storage.get(DEFAULT_TOKEN_KEY).unwrap().is_none());

    let reloaded_again = SessionState::new(storage);
    assert!(!reloaded_again.restore());
    assert!(!reloaded_again.is_authenticated());
}

#[test]
fn given_custom_key_when_setting_token_then_uses_that_key() {
    let storage = Arc::new(MemoryStorage::new());
    let session = SessionState::with_key(storage.clone(), "panel-token");

    session.set_token(Some("xyz")).unwrap();

    assert!(storage.contains("panel-token"));
    assert!(!storage.contains(DEFAULT_TOKEN_KEY));
    assert_eq!(session.storage_key(), "panel-token");
}

#[test]
fn given_session_when_debug_formatted_then_token_is_redacted() {
    let session = SessionState::new(Arc::new(MemoryStorage::new()));
    session.set_token(Some("very-secret")).unwrap();

    let debug = format!("{session:?}");

    assert!(!debug.contains("very-secret"));
}
