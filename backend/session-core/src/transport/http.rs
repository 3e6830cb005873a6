use crate::error::TransportError;
use crate::session::SessionState;
use crate::transport::{AuthTransport, CHECK_AUTH_ENDPOINT, Credentials, LOGIN_ENDPOINT, LoginResponse};

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use reqwest::{Client, Method, RequestBuilder};
use url::Url;

pub const DEFAULT_TIMEOUT_DURATION: Duration = Duration::from_secs(30);
pub const DEFAULT_AUTH_HEADER: &str = "X-Auth-Token";

/// `reqwest`-backed client for the panel API.
///
/// Every request built through [`request`](Self::request) carries the
/// current session token in the auth header, read at build time so a
/// request never goes out with a token that was already replaced.
#[derive(Clone)]
pub struct HttpTransport {
    base_url: Url,
    client: Client,
    session: Arc<SessionState>,
    auth_header: String,
}

impl HttpTransport {
    pub fn new(base_url_str: &str, session: Arc<SessionState>) -> Result<Self, TransportError> {
        Self::with_options(base_url_str, session, DEFAULT_AUTH_HEADER, DEFAULT_TIMEOUT_DURATION)
    }

    pub fn with_options(
        base_url_str: &str,
        session: Arc<SessionState>,
        auth_header: &str,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let mut base_url = Url::parse(base_url_str)?;
        // `Url::join` replaces the last segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::client(e.to_string()))?;

        Ok(Self {
            base_url,
            client,
            session,
            auth_header: auth_header.to_string(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Start a request to `endpoint` (relative to the API base) with the
    /// session token attached when one is present.
    pub fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder, TransportError> {
        let url = self.base_url.join(endpoint)?;
        Ok(self.prepare_request(self.client.request(method, url)))
    }

    fn prepare_request(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.header(self.auth_header.as_str(), token.expose()),
            None => request,
        }
    }
}

impl AuthTransport for HttpTransport {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, TransportError> {
        let response = self
            .request(Method::POST, LOGIN_ENDPOINT)?
            .json(credentials)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(LOGIN_ENDPOINT, &e))?;

        let status = response.status();
        debug!("POST {LOGIN_ENDPOINT} -> {}", status.as_u16());
        if !status.is_success() {
            return Err(TransportError::status(LOGIN_ENDPOINT, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::from_reqwest(LOGIN_ENDPOINT, &e))?;

        serde_json::from_str(&body).map_err(|e| TransportError::decode(LOGIN_ENDPOINT, e.to_string()))
    }

    async fn check_auth(&self) -> Result<(), TransportError> {
        let response = self
            .request(Method::GET, CHECK_AUTH_ENDPOINT)?
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(CHECK_AUTH_ENDPOINT, &e))?;

        let status = response.status();
        debug!("GET {CHECK_AUTH_ENDPOINT} -> {}", status.as_u16());
        if !status.is_success() {
            return Err(TransportError::status(CHECK_AUTH_ENDPOINT, status.as_u16()));
        }

        Ok(())
    }
}
