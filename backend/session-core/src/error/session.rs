//! Error types surfaced by session operations.
//!
//! Only `login` and `set_token` return these. Verification never fails
//! outward: a 401 there ends the session locally and everything else leaves
//! it untouched.

use crate::error::{StorageError, TransportError};

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum SessionError {
    #[error("Login Rejected Error: server answered {status_code} {location}")]
    LoginRejected {
        status_code: HttpStatusCode,
        location: ErrorLocation,
    },

    #[error("Transport Unavailable Error: {source} {location}")]
    TransportUnavailable {
        #[source]
        source: TransportError,
        location: ErrorLocation,
    },

    #[error("Malformed Response Error: {message} {location}")]
    MalformedResponse {
        message: String,
        location: ErrorLocation,
    },

    #[error("Login In Progress Error: another login has not finished yet {location}")]
    LoginInProgress { location: ErrorLocation },

    #[error("Session Storage Error: {source} {location}")]
    Storage {
        #[source]
        source: StorageError,
        location: ErrorLocation,
    },
}

impl From<StorageError> for SessionError {
    #[track_caller]
    fn from(source: StorageError) -> Self {
        SessionError::Storage {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl SessionError {
    /// Classify a failed login call.
    ///
    /// 4xx means the server looked at the credentials and said no; a bad
    /// body is malformed; everything else is the transport being unavailable.
    #[track_caller]
    pub fn from_login_failure(error: TransportError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        match error {
            TransportError::Status { status_code, .. } if status_code.is_client_error() => {
                SessionError::LoginRejected {
                    status_code,
                    location,
                }
            }
            TransportError::Decode { message, .. } => {
                SessionError::MalformedResponse { message, location }
            }
            other => SessionError::TransportUnavailable {
                source: other,
                location,
            },
        }
    }

    #[track_caller]
    pub fn malformed_response(message: impl Into<String>) -> Self {
        SessionError::MalformedResponse {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn login_in_progress() -> Self {
        SessionError::LoginInProgress {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, SessionError::LoginRejected { .. })
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            SessionError::LoginRejected { status_code, .. } => Some(status_code.0),
            SessionError::TransportUnavailable { source, .. } => source.status_code(),
            _ => None,
        }
    }
}
