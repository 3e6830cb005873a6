//! Error types for the authentication transport.
//!
//! - HTTP status codes stored directly (not parsed from strings)
//! - `is_unauthorized()` is the only signal that invalidates a session
//! - All errors include ErrorLocation for debugging

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum TransportError {
    #[error("HTTP Status Error: {endpoint} returned {status_code} {location}")]
    Status {
        endpoint: String,
        status_code: HttpStatusCode,
        location: ErrorLocation,
    },

    #[error("Network Error: {endpoint}: {message} {location}")]
    Network {
        endpoint: String,
        message: String,
        is_timeout: bool,
        is_connection: bool,
        location: ErrorLocation,
    },

    #[error("Decode Error: {endpoint}: {message} {location}")]
    Decode {
        endpoint: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },

    #[error("Client Build Error: {message} {location}")]
    Client {
        message: String,
        location: ErrorLocation,
    },
}

impl From<url::ParseError> for TransportError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        TransportError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl TransportError {
    #[track_caller]
    pub fn status(endpoint: impl Into<String>, status_code: impl Into<HttpStatusCode>) -> Self {
        TransportError::Status {
            endpoint: endpoint.into(),
            status_code: status_code.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn timeout(endpoint: impl Into<String>) -> Self {
        TransportError::Network {
            endpoint: endpoint.into(),
            message: String::from("request timed out"),
            is_timeout: true,
            is_connection: false,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn decode(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        TransportError::Decode {
            endpoint: endpoint.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn client(message: impl Into<String>) -> Self {
        TransportError::Client {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Create from reqwest error with proper categorization.
    #[track_caller]
    pub fn from_reqwest(endpoint: impl Into<String>, error: &reqwest::Error) -> Self {
        let endpoint = endpoint.into();

        // Check for specific error types BEFORE converting to string
        let is_timeout = error.is_timeout();
        let is_connect = error.is_connect();

        if is_timeout || is_connect {
            return TransportError::Network {
                endpoint,
                message: error.to_string(),
                is_timeout,
                is_connection: is_connect,
                location: ErrorLocation::from(Location::caller()),
            };
        }

        if let Some(status) = error.status() {
            return TransportError::Status {
                endpoint,
                status_code: HttpStatusCode(status.as_u16()),
                location: ErrorLocation::from(Location::caller()),
            };
        }

        if error.is_decode() {
            return TransportError::Decode {
                endpoint,
                message: error.to_string(),
                location: ErrorLocation::from(Location::caller()),
            };
        }

        TransportError::Network {
            endpoint,
            message: error.to_string(),
            is_timeout: false,
            is_connection: false,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// The server answered 401: the presented token is no longer valid.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, TransportError::Status { status_code, .. } if status_code.is_unauthorized())
    }

    /// The server answered with a 4xx, i.e. it rejected the request itself.
    pub fn is_rejection(&self) -> bool {
        matches!(self, TransportError::Status { status_code, .. } if status_code.is_client_error())
    }

    /// Get HTTP status code if applicable.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TransportError::Status { status_code, .. } => Some(status_code.0),
            _ => None,
        }
    }

    /// Get error category for logging.
    pub fn error_category(&self) -> &'static str {
        match self {
            TransportError::Status { status_code, .. } if status_code.is_unauthorized() => {
                "unauthorized"
            }
            TransportError::Status { status_code, .. } if status_code.is_client_error() => {
                "client_error"
            }
            TransportError::Status { status_code, .. } if status_code.is_server_error() => {
                "server_error"
            }
            TransportError::Status { .. } => "status",
            TransportError::Network { is_timeout: true, .. } => "timeout",
            TransportError::Network { is_connection: true, .. } => "connection",
            TransportError::Network { .. } => "network",
            TransportError::Decode { .. } => "decode",
            TransportError::UrlParse { .. } => "url_parse",
            TransportError::Client { .. } => "client",
        }
    }
}
