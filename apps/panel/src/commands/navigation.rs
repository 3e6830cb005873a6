use crate::error::PanelError;
use crate::state::AppState;

use session_core::routes::RouteDescriptor;

use std::fmt::{Display, Formatter, Result as FormatResult};

use log::warn;
use serde::Serialize;

/// Where a navigation ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationReport {
    pub requested: String,
    pub path: String,
    pub redirected_from: Option<String>,
    pub title: String,
}

impl Display for NavigationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        match &self.redirected_from {
            Some(from) => write!(f, "{from} -> {} ({})", self.path, self.title),
            None => write!(f, "{} ({})", self.path, self.title),
        }
    }
}

/// One row of the route table. Flags are the ones declared on the record;
/// children inherit their parents' flags at match time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSummary {
    pub path: String,
    pub name: Option<String>,
    pub requires_auth: bool,
    pub guest_only: bool,
    pub title: Option<String>,
    pub redirect: Option<String>,
}

impl From<&RouteDescriptor> for RouteSummary {
    fn from(descriptor: &RouteDescriptor) -> Self {
        Self {
            path: descriptor.path.clone(),
            name: descriptor.name.clone(),
            requires_auth: descriptor.meta.requires_auth,
            guest_only: descriptor.meta.guest_only,
            title: descriptor.meta.title.clone(),
            redirect: descriptor.redirect.clone(),
        }
    }
}

impl Display for RouteSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        let access = match (self.requires_auth, self.guest_only) {
            (true, _) => "auth",
            (false, true) => "guest",
            (false, false) => "public",
        };
        write!(f, "{:<24} {:<7}", self.path, access)?;
        if let Some(name) = &self.name {
            write!(f, " name={name}")?;
        }
        if let Some(title) = &self.title {
            write!(f, " title={title:?}")?;
        }
        if let Some(redirect) = &self.redirect {
            write!(f, " -> {redirect}")?;
        }
        Ok(())
    }
}

/// Navigate to `target` through the guard.
///
/// # Errors
///
/// Returns [`PanelError::Core`] on a redirect loop or a superseded navigation.
pub fn navigate(state: &AppState, target: &str) -> Result<NavigationReport, PanelError> {
    let navigation = state.router().push(target).map_err(|e| {
        warn!("Navigation to '{target}' failed: {e}");
        PanelError::core(e)
    })?;

    Ok(NavigationReport {
        requested: target.to_string(),
        path: navigation.path,
        redirected_from: navigation.redirected_from,
        title: navigation.title,
    })
}

/// Every declared route record in declaration order, layout parents included.
pub fn routes(state: &AppState) -> Vec<RouteSummary> {
    state
        .router()
        .registry()
        .descriptors()
        .map(RouteSummary::from)
        .collect()
}
