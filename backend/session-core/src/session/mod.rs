//! Session state: the token, its persistence and the derived flag.
//!
//! `SessionState` is the only owner of the token. It is constructed once by
//! the application and shared by `Arc` with the router (read side) and the
//! [`SessionStore`] (operations). Every mutation funnels through
//! [`SessionState::set_token`], which keeps memory and durable storage in
//! lockstep; the one exception is [`SessionState::restore`] at startup.

pub mod store;

pub use store::{SessionStore, VerifyOutcome};

use crate::error::SessionError;
use crate::storage::TokenStorage;

use common::RedactedToken;

use std::sync::{Arc, PoisonError, RwLock};

use log::{info, warn};

/// Storage key holding the token.
pub const DEFAULT_TOKEN_KEY: &str = "token";

/// Read access to the authentication flag.
///
/// The guard and router only need this much of the session.
pub trait AuthStatus: Send + Sync {
    fn is_authenticated(&self) -> bool;
}

pub struct SessionState {
    token: RwLock<Option<RedactedToken>>,
    storage: Arc<dyn TokenStorage>,
    storage_key: String,
}

impl SessionState {
    /// Empty session backed by `storage`. Call [`restore`](Self::restore)
    /// to pick up a token persisted by a previous run.
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        Self::with_key(storage, DEFAULT_TOKEN_KEY)
    }

    pub fn with_key(storage: Arc<dyn TokenStorage>, storage_key: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(None),
            storage,
            storage_key: storage_key.into(),
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Load the persisted token into memory. No network call.
    ///
    /// A storage failure is logged and leaves the session unauthenticated.
    /// Returns whether a token was found.
    pub fn restore(&self) -> bool {
        let restored = match self.storage.get(&self.storage_key) {
            Ok(value) => value.and_then(RedactedToken::new),
            Err(e) => {
                warn!("Failed to read persisted session, starting signed out: {e}");
                None
            }
        };

        let found = restored.is_some();
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = restored;

        if found {
            info!("Restored persisted session token");
        } else {
            info!("No persisted session token found");
        }
        found
    }

    /// Replace the token, keeping storage in sync.
    ///
    /// `None` and `Some("")` both mean "no session". Setting a value persists
    /// first and only then updates memory, so a failed write changes nothing.
    /// Clearing always empties memory, even when deleting the persisted value
    /// fails; that failure is still returned.
    pub fn set_token(&self, value: Option<&str>) -> Result<(), SessionError> {
        let mut token = self.token.write().unwrap_or_else(PoisonError::into_inner);

        match value.and_then(RedactedToken::new) {
            Some(new_token) => {
                self.storage.set(&self.storage_key, new_token.expose())?;
                *token = Some(new_token);
                Ok(())
            }
            None => {
                *token = None;
                self.storage.remove(&self.storage_key)?;
                Ok(())
            }
        }
    }

    /// Current token, if any.
    pub fn token(&self) -> Option<RedactedToken> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Computed on every call; never cached.
    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|token| !token.is_empty())
    }
}

impl AuthStatus for SessionState {
    fn is_authenticated(&self) -> bool {
        SessionState::is_authenticated(self)
    }
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("token", &self.token())
            .field("storage_key", &self.storage_key)
            .finish()
    }
}
