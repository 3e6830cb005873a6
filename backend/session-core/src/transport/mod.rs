//! The two HTTP calls the session needs, behind a trait.
//!
//! [`HttpTransport`] is the production implementation. Tests substitute
//! their own.

pub mod http;

pub use http::HttpTransport;

use crate::error::TransportError;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub const LOGIN_ENDPOINT: &str = "login";
pub const CHECK_AUTH_ENDPOINT: &str = "check-auth";

/// Username and password for the login call.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Body of a successful login answer.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: String,
}

pub trait AuthTransport: Send + Sync {
    /// `POST <api-base>/login`. Any non-2xx answer is an error.
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<LoginResponse, TransportError>> + Send;

    /// `GET <api-base>/check-auth`. Any 2xx answer is success.
    fn check_auth(&self) -> impl Future<Output = Result<(), TransportError>> + Send;
}

impl<T: AuthTransport> AuthTransport for Arc<T> {
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<LoginResponse, TransportError>> + Send {
        (**self).login(credentials)
    }

    fn check_auth(&self) -> impl Future<Output = Result<(), TransportError>> + Send {
        (**self).check_auth()
    }
}
