use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum NavigationError {
    #[error("Redirect Loop Error: '{path}' still redirecting after {hops} hops {location}")]
    RedirectLoop {
        path: String,
        hops: usize,
        location: ErrorLocation,
    },

    #[error("Superseded Error: navigation to '{path}' replaced by a newer one {location}")]
    Superseded {
        path: String,
        location: ErrorLocation,
    },
}

impl NavigationError {
    #[track_caller]
    pub fn redirect_loop(path: impl Into<String>, hops: usize) -> Self {
        NavigationError::RedirectLoop {
            path: path.into(),
            hops,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn superseded(path: impl Into<String>) -> Self {
        NavigationError::Superseded {
            path: path.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
