use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

/// Route table configuration errors, raised while building the registry.
#[derive(Debug, ThisError)]
pub enum RouteError {
    #[error("Route Access Error: '{path}' is both requires_auth and guest_only {location}")]
    ConflictingAccess {
        path: String,
        location: ErrorLocation,
    },

    #[error("Route Pattern Error: '{path}': {reason} {location}")]
    InvalidPattern {
        path: String,
        reason: String,
        location: ErrorLocation,
    },

    #[error("Route Name Error: '{name}' is declared more than once {location}")]
    DuplicateName {
        name: String,
        location: ErrorLocation,
    },
}

impl RouteError {
    #[track_caller]
    pub fn conflicting_access(path: impl Into<String>) -> Self {
        RouteError::ConflictingAccess {
            path: path.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_pattern(path: impl Into<String>, reason: impl Into<String>) -> Self {
        RouteError::InvalidPattern {
            path: path.into(),
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        RouteError::DuplicateName {
            name: name.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
