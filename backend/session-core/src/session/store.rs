//! Session operations: login, logout and verification.

use crate::error::SessionError;
use crate::router::Navigator;
use crate::session::SessionState;
use crate::transport::{AuthTransport, Credentials};
use crate::{HOME_PATH, LOGIN_PATH};

use common::RedactedToken;

use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::sync::Mutex;

/// Result of [`SessionStore::verify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// No token, nothing was sent.
    Skipped,
    /// Server accepted the token.
    Valid,
    /// Server answered 401; the session was logged out.
    Invalidated,
    /// Server answered 401 for a token that had already been replaced.
    Superseded,
    /// Network failure, timeout or non-401 error; the session is unchanged.
    Unreachable,
}

/// Login/logout/verify on top of a shared [`SessionState`].
///
/// Navigation after login and logout goes through the injected
/// [`Navigator`], so the store never depends on the router type.
///
/// Only one login may be in flight at a time. A second call while the first
/// is still waiting on the network fails immediately with
/// [`SessionError::LoginInProgress`] and sends nothing.
pub struct SessionStore<T: AuthTransport> {
    state: Arc<SessionState>,
    transport: T,
    navigator: Arc<dyn Navigator>,
    home_path: String,
    login_path: String,
    login_gate: Mutex<()>,
}

impl<T: AuthTransport> SessionStore<T> {
    pub fn new(state: Arc<SessionState>, transport: T, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            state,
            transport,
            navigator,
            home_path: HOME_PATH.to_string(),
            login_path: LOGIN_PATH.to_string(),
            login_gate: Mutex::new(()),
        }
    }

    /// Override where login and logout navigate to.
    pub fn with_paths(mut self, home_path: impl Into<String>, login_path: impl Into<String>) -> Self {
        self.home_path = home_path.into();
        self.login_path = login_path.into();
        self
    }

    pub fn state(&self) -> &Arc<SessionState> {
        &self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    pub fn token(&self) -> Option<RedactedToken> {
        self.state.token()
    }

    pub fn set_token(&self, value: Option<&str>) -> Result<(), SessionError> {
        self.state.set_token(value)
    }

    /// Exchange credentials for a token, then navigate home.
    ///
    /// Any failure clears the session before the error is returned. No
    /// redirect happens on failure.
    ///
    /// # Errors
    ///
    /// - [`SessionError::LoginInProgress`] if another login is in flight
    /// - [`SessionError::LoginRejected`] on a 4xx answer
    /// - [`SessionError::TransportUnavailable`] on network failure or 5xx
    /// - [`SessionError::MalformedResponse`] if the answer has no usable token
    /// - [`SessionError::Storage`] if the token could not be persisted
    pub async fn login(&self, credentials: &Credentials) -> Result<(), SessionError> {
        let Ok(_in_flight) = self.login_gate.try_lock() else {
            warn!("Login for '{}' rejected: another login is in flight", credentials.username);
            return Err(SessionError::login_in_progress());
        };

        info!("Logging in as '{}'", credentials.username);

        let response = match self.transport.login(credentials).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Login failed ({}): {}", e.error_category(), e);
                self.clear_session();
                return Err(SessionError::from_login_failure(e));
            }
        };

        let Some(token) = RedactedToken::new(response.token) else {
            warn!("Login response carried no token");
            self.clear_session();
            return Err(SessionError::malformed_response("login response carried an empty token"));
        };

        if let Err(e) = self.state.set_token(Some(token.expose())) {
            warn!("Login succeeded but the session token could not be stored: {e}");
            self.clear_session();
            return Err(e);
        }
        info!("Login succeeded, session token stored ({} chars)", token.len());

        self.navigator.navigate(&self.home_path);
        Ok(())
    }

    /// Drop the session and navigate to the login route. Never fails.
    pub fn logout(&self) {
        info!("Logging out");
        self.clear_session();
        self.navigator.navigate(&self.login_path);
    }

    /// Ask the server whether the current token is still valid.
    ///
    /// Without a token this returns at once and sends nothing. Only a 401
    /// ends the session; an unreachable server never does.
    pub async fn verify(&self) -> VerifyOutcome {
        let Some(presented) = self.state.token() else {
            debug!("No session token, skipping verification");
            return VerifyOutcome::Skipped;
        };

        match self.transport.check_auth().await {
            Ok(()) => {
                debug!("Session token verified");
                VerifyOutcome::Valid
            }
            Err(e) if e.is_unauthorized() => {
                if self.state.token().as_ref() != Some(&presented) {
                    info!("Ignoring 401 for a session token that was already replaced");
                    return VerifyOutcome::Superseded;
                }
                warn!("Session token rejected by server, logging out");
                self.logout();
                VerifyOutcome::Invalidated
            }
            Err(e) => {
                warn!(
                    "Session verification failed ({}), keeping session: {}",
                    e.error_category(),
                    e
                );
                VerifyOutcome::Unreachable
            }
        }
    }

    fn clear_session(&self) {
        if let Err(e) = self.state.set_token(None) {
            error!("Failed to delete persisted session token: {e}");
        }
    }
}
