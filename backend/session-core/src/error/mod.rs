pub mod config;
pub mod navigation;
pub mod route;
pub mod session;
pub mod storage;
pub mod transport;

pub use navigation::NavigationError;
pub use route::RouteError;
pub use session::SessionError;
pub use storage::StorageError;
pub use transport::TransportError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),
}
