use common::ErrorLocation;

use std::fmt::Display;
use std::panic::Location;

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by panel commands.
///
/// Core failures are flattened to their message so the error stays
/// serializable for `--json` output, but the location is kept.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum PanelError {
    /// Error from this App
    #[error("Panel Error: {message} {location}")]
    Panel {
        message: String,
        location: ErrorLocation,
    },

    /// Error from session-core (config, session, routing)
    #[error("Core Error: {message} {location}")]
    Core {
        message: String,
        location: ErrorLocation,
    },
}

impl PanelError {
    #[track_caller]
    pub fn panel(message: impl Into<String>) -> Self {
        PanelError::Panel {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn core(error: impl Display) -> Self {
        PanelError::Core {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
