use session_core::guard::{DocumentTitle, NavigationGuard};
use session_core::router::Router;
use session_core::routes::{RouteRegistry, default_routes};
use session_core::session::{SessionState, SessionStore};
use session_core::storage::{MemoryStorage, TokenStorage};
use session_core::transport::HttpTransport;

use std::sync::Arc;
use std::time::Duration;

use wiremock::MockServer;

/// Everything wired together the way the panel does it, against a mock API.
pub struct Wired {
    pub state: Arc<SessionState>,
    pub router: Arc<Router>,
    pub title: Arc<DocumentTitle>,
    pub store: SessionStore<HttpTransport>,
}

pub fn api_base(server: &MockServer) -> String {
    format!("{}/api", server.uri())
}

pub fn wire(server: &MockServer, storage: Arc<dyn TokenStorage>) -> Wired {
    wire_with_timeout(server, storage, Duration::from_secs(5))
}

pub fn wire_with_timeout(
    server: &MockServer,
    storage: Arc<dyn TokenStorage>,
    timeout: Duration,
) -> Wired {
    let state = Arc::new(SessionState::new(storage));
    state.restore();

    let title = Arc::new(DocumentTitle::new());
    let router = Arc::new(Router::new(
        RouteRegistry::new(default_routes()).expect("default routes are valid"),
        NavigationGuard::default(),
        state.clone(),
        title.clone(),
    ));

    let transport = HttpTransport::with_options(&api_base(server), state.clone(), "X-Auth-Token", timeout)
        .expect("mock server URI is valid");
    let store = SessionStore::new(state.clone(), transport, router.clone());

    Wired {
        state,
        router,
        title,
        store,
    }
}

pub fn storage_with_token(token: &str) -> Arc<dyn TokenStorage> {
    Arc::new(MemoryStorage::with_entry("token", token))
}

pub fn empty_storage() -> Arc<dyn TokenStorage> {
    Arc::new(MemoryStorage::new())
}
