use crate::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

/// Raised when a secret wrapper is asked to leave the process by itself.
#[derive(Debug, ThisError)]
pub enum RedactError {
    #[error("Serialization Error: {type_name} cannot be serialized, use expose() explicitly {location}")]
    SerializationRefused {
        type_name: &'static str,
        location: ErrorLocation,
    },
}

impl RedactError {
    #[track_caller]
    pub fn refused(type_name: &'static str) -> Self {
        RedactError::SerializationRefused {
            type_name,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
