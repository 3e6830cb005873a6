pub mod config;
pub mod error;
pub mod guard;
pub mod router;
pub mod routes;
pub mod session;
pub mod storage;
pub mod transport;

#[cfg(test)]
mod tests;

pub use error::CoreError;

pub const APP_DIR_NAME: &str = "antizapret-panel";
pub const DEFAULT_API_HOST: &str = "localhost";
pub const DEFAULT_API_PORT: u16 = 8080;
pub const DEFAULT_API_BASE_URL: &str =
    const_format::concatcp!("http://", DEFAULT_API_HOST, ":", DEFAULT_API_PORT, "/api/");
pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
