use std::sync::{PoisonError, RwLock};

pub const DEFAULT_TITLE_PREFIX: &str = "Antizapret";
pub const DEFAULT_TITLE_FALLBACK: &str = "Panel";
pub const DEFAULT_TITLE_SEPARATOR: &str = " | ";

/// How page titles are built from route titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleFormat {
    pub prefix: String,
    pub fallback: String,
    pub separator: String,
}

impl TitleFormat {
    /// `"<prefix><separator><title or fallback>"`.
    pub fn format(&self, route_title: Option<&str>) -> String {
        let title = route_title
            .filter(|title| !title.trim().is_empty())
            .unwrap_or(&self.fallback);
        format!("{}{}{}", self.prefix, self.separator, title)
    }
}

impl Default for TitleFormat {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_TITLE_PREFIX.to_string(),
            fallback: DEFAULT_TITLE_FALLBACK.to_string(),
            separator: DEFAULT_TITLE_SEPARATOR.to_string(),
        }
    }
}

/// Wherever the page title is displayed.
pub trait TitleSink: Send + Sync {
    fn set_title(&self, title: &str);
}

/// In-memory title holder.
#[derive(Debug, Default)]
pub struct DocumentTitle {
    title: RwLock<String>,
}

impl DocumentTitle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> String {
        self.title
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TitleSink for DocumentTitle {
    fn set_title(&self, title: &str) {
        *self.title.write().unwrap_or_else(PoisonError::into_inner) = title.to_string();
    }
}
