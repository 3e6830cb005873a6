use crate::error::config::ConfigError;
use crate::guard::title::{DEFAULT_TITLE_FALLBACK, DEFAULT_TITLE_PREFIX, DEFAULT_TITLE_SEPARATOR};
use crate::guard::{GuardPaths, TitleFormat};
use crate::router::DEFAULT_MAX_REDIRECTS;
use crate::routes::{Resolution, RouteRegistry};
use crate::session::DEFAULT_TOKEN_KEY;
use crate::storage::file::DEFAULT_STORAGE_FILE_NAME;
use crate::transport::http::DEFAULT_AUTH_HEADER;
use crate::{APP_DIR_NAME, DEFAULT_API_BASE_URL, HOME_PATH, LOGIN_PATH};

use common::ErrorLocation;

use std::env;
use std::num::ParseIntError;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::header::HeaderName;
use serde::{Deserialize, Serialize};
use url::Url;

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_VERSION: u32 = 1;

const MIN_TIMEOUT_SECS: u64 = 1;
const MAX_TIMEOUT_SECS: u64 = 300;
const MAX_REDIRECTS_LIMIT: usize = 50;

pub const ENV_API_BASE_URL: &str = "PANEL_API_BASE_URL";
pub const ENV_AUTH_HEADER: &str = "PANEL_AUTH_HEADER";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "PANEL_REQUEST_TIMEOUT_SECS";

// ============================================
// CONFIG STRUCTS
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_auth_header")]
    pub auth_header: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_header: default_auth_header(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationConfig {
    #[serde(default = "default_home_path")]
    pub home_path: String,
    #[serde(default = "default_login_path")]
    pub login_path: String,
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            home_path: default_home_path(),
            login_path: default_login_path(),
            max_redirects: default_max_redirects(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleConfig {
    #[serde(default = "default_title_prefix")]
    pub prefix: String,
    #[serde(default = "default_title_fallback")]
    pub fallback: String,
    #[serde(default = "default_title_separator")]
    pub separator: String,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            prefix: default_title_prefix(),
            fallback: default_title_fallback(),
            separator: default_title_separator(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_token_key")]
    pub token_key: String,
    #[serde(default = "default_storage_file_name")]
    pub file_name: String,
    /// Overrides the platform data directory.
    #[serde(default)]
    pub directory_override: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            token_key: default_token_key(),
            file_name: default_storage_file_name(),
            directory_override: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub navigation: NavigationConfig,

    #[serde(default)]
    pub title: TitleConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            api: ApiConfig::default(),
            navigation: NavigationConfig::default(),
            title: TitleConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}
fn default_auth_header() -> String {
    DEFAULT_AUTH_HEADER.to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_home_path() -> String {
    HOME_PATH.to_string()
}
fn default_login_path() -> String {
    LOGIN_PATH.to_string()
}
fn default_max_redirects() -> usize {
    DEFAULT_MAX_REDIRECTS
}
fn default_title_prefix() -> String {
    DEFAULT_TITLE_PREFIX.to_string()
}
fn default_title_fallback() -> String {
    DEFAULT_TITLE_FALLBACK.to_string()
}
fn default_title_separator() -> String {
    DEFAULT_TITLE_SEPARATOR.to_string()
}
fn default_token_key() -> String {
    DEFAULT_TOKEN_KEY.to_string()
}
fn default_storage_file_name() -> String {
    DEFAULT_STORAGE_FILE_NAME.to_string()
}

// ============================================
// IMPLEMENTATION
// ============================================

impl PanelConfig {
    /// Platform config directory for the panel, e.g. `~/.config/antizapret-panel`.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME))
    }

    /// Load config from {config_dir}/config.json.
    ///
    /// # Returns
    ///
    /// Returns `Ok(PanelConfig)` if loaded successfully or defaults if file missing.
    /// Returns `Err(ConfigError)` if file exists but is corrupted/invalid.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read config file: {}", e);
            ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: PanelConfig = serde_json::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config JSON: {}", e);
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Save config to {config_dir}/config.json using atomic write.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if validation, serialization, the write or
    /// the rename fails.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let temp_path = config_dir.join(format!("{}.tmp", CONFIG_FILE_NAME));

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            location: ErrorLocation::from(Location::caller()),
            reason: e.to_string(),
        })?;

        std::fs::write(&temp_path, json).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: temp_path.clone(),
            source: e,
        })?;

        // Atomic rename (POSIX guarantees atomicity)
        std::fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_path.clone(),
            source: e,
        })?;

        info!("Config saved to {}", config_path.display());
        Ok(())
    }

    /// Apply `PANEL_*` overrides from the environment, loading `.env` first.
    ///
    /// A missing `.env` is fine. The result is validated again.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded .env from: {:?}", path),
            Err(_) => debug!("No .env file found - using process environment only"),
        }

        if let Ok(base_url) = env::var(ENV_API_BASE_URL) {
            info!("API base URL overridden by {ENV_API_BASE_URL}");
            self.api.base_url = base_url;
        }

        if let Ok(header) = env::var(ENV_AUTH_HEADER) {
            info!("Auth header overridden by {ENV_AUTH_HEADER}");
            self.api.auth_header = header;
        }

        if let Ok(raw) = env::var(ENV_REQUEST_TIMEOUT_SECS) {
            self.api.timeout_secs = raw.trim().parse().map_err(|e: ParseIntError| ConfigError::EnvOverride {
                location: ErrorLocation::from(Location::caller()),
                variable: ENV_REQUEST_TIMEOUT_SECS,
                value: raw.clone(),
                reason: e.to_string(),
            })?;
        }

        self.validate()
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(validation_error(format!(
                "Invalid version: {} (expected 1-{})",
                self.version, CONFIG_VERSION
            )));
        }

        let url = Url::parse(&self.api.base_url)
            .map_err(|e| validation_error(format!("Invalid API base URL '{}': {e}", self.api.base_url)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(validation_error(format!(
                "Invalid API base URL scheme: {}",
                url.scheme()
            )));
        }

        if HeaderName::from_bytes(self.api.auth_header.as_bytes()).is_err() {
            return Err(validation_error(format!(
                "Invalid auth header name: '{}'",
                self.api.auth_header
            )));
        }

        if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&self.api.timeout_secs) {
            return Err(validation_error(format!(
                "Invalid request timeout: {} (must be {MIN_TIMEOUT_SECS}-{MAX_TIMEOUT_SECS})",
                self.api.timeout_secs
            )));
        }

        for (name, path) in [
            ("home_path", &self.navigation.home_path),
            ("login_path", &self.navigation.login_path),
        ] {
            if !path.starts_with('/') {
                return Err(validation_error(format!("{name} must start with '/': {path}")));
            }
        }

        if self.navigation.home_path == self.navigation.login_path {
            return Err(validation_error("home_path and login_path must differ"));
        }

        if self.navigation.max_redirects == 0 || self.navigation.max_redirects > MAX_REDIRECTS_LIMIT {
            return Err(validation_error(format!(
                "Invalid max_redirects: {} (must be 1-{MAX_REDIRECTS_LIMIT})",
                self.navigation.max_redirects
            )));
        }

        if self.storage.token_key.trim().is_empty() {
            return Err(validation_error("storage token_key cannot be empty"));
        }

        if self.storage.file_name.trim().is_empty() {
            return Err(validation_error("storage file_name cannot be empty"));
        }

        Ok(())
    }

    /// Check the configured home and login paths against the route table.
    ///
    /// The home path must match a route that is not guest-only, and the login
    /// path must match a guest-only route with no protected ancestor.
    /// Anything else makes the guard redirect in circles.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the offending path.
    pub fn validate_routes(&self, registry: &RouteRegistry) -> Result<(), ConfigError> {
        let home = &self.navigation.home_path;
        match registry.resolve(home) {
            Resolution::Matched(matched)
                if !matched.leaf().is_some_and(|leaf| leaf.meta.guest_only) => {}
            _ => {
                return Err(validation_error(format!(
                    "home_path '{home}' must match a route that is not guest-only"
                )));
            }
        }

        let login = &self.navigation.login_path;
        match registry.resolve(login) {
            Resolution::Matched(matched)
                if matched.leaf().is_some_and(|leaf| leaf.meta.guest_only)
                    && !matched.metas().any(|meta| meta.requires_auth) => {}
            _ => {
                return Err(validation_error(format!(
                    "login_path '{login}' must match a guest-only route that does not require auth"
                )));
            }
        }

        debug!("Navigation paths '{home}' and '{login}' match the route table");
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn guard_paths(&self) -> GuardPaths {
        GuardPaths {
            home: self.navigation.home_path.clone(),
            login: self.navigation.login_path.clone(),
        }
    }

    pub fn title_format(&self) -> TitleFormat {
        TitleFormat {
            prefix: self.title.prefix.clone(),
            fallback: self.title.fallback.clone(),
            separator: self.title.separator.clone(),
        }
    }

    /// Where the token storage file lives, if a directory can be determined.
    pub fn storage_path(&self) -> Option<PathBuf> {
        let dir = match &self.storage.directory_override {
            Some(dir) => dir.clone(),
            None => dirs::data_local_dir()?.join(APP_DIR_NAME),
        };
        Some(dir.join(&self.storage.file_name))
    }
}

#[track_caller]
fn validation_error(reason: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        location: ErrorLocation::from(Location::caller()),
        reason: reason.into(),
    }
}
