use crate::error::PanelError;

use session_core::config::PanelConfig;
use session_core::guard::{DocumentTitle, NavigationGuard};
use session_core::router::Router;
use session_core::routes::{RouteRegistry, default_routes};
use session_core::session::{SessionState, SessionStore};
use session_core::storage::{FileStorage, MemoryStorage, TokenStorage};
use session_core::transport::HttpTransport;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{info, warn};

/// Everything one panel process needs, wired once at startup.
///
/// Construction order matters: the session is restored from storage before
/// the router or transport can observe it.
pub struct AppState {
    config: PanelConfig,
    session: Arc<SessionState>,
    title: Arc<DocumentTitle>,
    router: Arc<Router>,
    store: SessionStore<HttpTransport>,
    storage_path: Option<PathBuf>,
}

impl AppState {
    /// Load `config.json` from `config_dir`, apply environment overrides and wire up.
    pub fn load(config_dir: &Path) -> Result<Self, PanelError> {
        let mut config = PanelConfig::load(config_dir).map_err(PanelError::core)?;
        config.apply_env_overrides().map_err(PanelError::core)?;
        Self::new(config)
    }

    pub fn new(config: PanelConfig) -> Result<Self, PanelError> {
        config.validate().map_err(PanelError::core)?;

        let storage_path = config.storage_path();
        let storage: Arc<dyn TokenStorage> = match &storage_path {
            Some(path) => {
                info!("Session storage: {}", path.display());
                Arc::new(FileStorage::new(path))
            }
            None => {
                warn!("No data directory available, session will not survive a restart");
                Arc::new(MemoryStorage::new())
            }
        };

        let session = Arc::new(SessionState::with_key(storage, config.storage.token_key.as_str()));
        if session.restore() {
            info!("Restored persisted session");
        }

        let registry = RouteRegistry::new(default_routes()).map_err(PanelError::core)?;
        config.validate_routes(&registry).map_err(PanelError::core)?;
        let title = Arc::new(DocumentTitle::new());
        let router = Arc::new(
            Router::new(
                registry,
                NavigationGuard::new(config.guard_paths(), config.title_format()),
                session.clone(),
                title.clone(),
            )
            .with_max_redirects(config.navigation.max_redirects),
        );

        let transport = HttpTransport::with_options(
            &config.api.base_url,
            session.clone(),
            &config.api.auth_header,
            config.request_timeout(),
        )
        .map_err(PanelError::core)?;

        let store = SessionStore::new(session.clone(), transport, router.clone())
            .with_paths(config.navigation.home_path.as_str(), config.navigation.login_path.as_str());

        Ok(Self {
            config,
            session,
            title,
            router,
            store,
            storage_path,
        })
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionState> {
        &self.session
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn title(&self) -> String {
        self.title.get()
    }

    pub fn store(&self) -> &SessionStore<HttpTransport> {
        &self.store
    }

    pub fn storage_path(&self) -> Option<&Path> {
        self.storage_path.as_deref()
    }
}
