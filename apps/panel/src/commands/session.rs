use crate::error::PanelError;
use crate::state::AppState;

use session_core::session::VerifyOutcome;
use session_core::transport::Credentials;

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::path::PathBuf;

use log::{debug, error, info};
use serde::Serialize;

/// Snapshot of the session and the router's committed location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub authenticated: bool,
    pub location: Option<String>,
    pub title: String,
    pub storage_path: Option<PathBuf>,
}

impl Display for StatusReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        writeln!(
            f,
            "Session:  {}",
            if self.authenticated { "signed in" } else { "signed out" }
        )?;
        writeln!(f, "Location: {}", self.location.as_deref().unwrap_or("-"))?;
        writeln!(f, "Title:    {}", self.title)?;
        match &self.storage_path {
            Some(path) => write!(f, "Storage:  {}", path.display()),
            None => write!(f, "Storage:  in-memory"),
        }
    }
}

pub fn status(state: &AppState) -> StatusReport {
    StatusReport {
        authenticated: state.session().is_authenticated(),
        location: state.router().current(),
        title: state.title(),
        storage_path: state.storage_path().map(PathBuf::from),
    }
}

/// Log in and land on the home route.
///
/// # Errors
///
/// Returns [`PanelError::Core`] carrying the session error message when the
/// server rejects the credentials, is unreachable, or the token can't be stored.
pub async fn login(state: &AppState, username: &str, password: &str) -> Result<StatusReport, PanelError> {
    debug!("Login requested for '{username}'");

    state
        .store()
        .login(&Credentials::new(username, password))
        .await
        .map_err(|e| {
            error!("Login failed: {e}");
            PanelError::core(e)
        })?;

    info!("Signed in as '{username}'");
    Ok(status(state))
}

pub fn logout(state: &AppState) -> StatusReport {
    state.store().logout();
    status(state)
}

/// Check the stored token with the server.
///
/// Never fails; an unreachable server is reported as
/// [`VerifyOutcome::Unreachable`] and leaves the session alone.
pub async fn verify(state: &AppState) -> VerifyOutcome {
    let outcome = state.store().verify().await;
    info!("Verification finished: {outcome:?}");
    outcome
}

pub fn describe_outcome(outcome: VerifyOutcome) -> &'static str {
    match outcome {
        VerifyOutcome::Skipped => "no session to verify",
        VerifyOutcome::Valid => "session is valid",
        VerifyOutcome::Invalidated => "session was rejected by the server and has been cleared",
        VerifyOutcome::Superseded => "session changed during verification",
        VerifyOutcome::Unreachable => "server unreachable, session kept",
    }
}
