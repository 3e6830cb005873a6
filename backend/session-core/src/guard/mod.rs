//! The navigation guard: who may see which route.
//!
//! [`decide`] is a pure function of the matched chain and the
//! authentication flag. [`NavigationGuard::evaluate`] wraps it with the
//! handling of unmatched and redirect targets and computes the page title,
//! but leaves applying that title to the router.

pub mod title;

pub use title::{DocumentTitle, TitleFormat, TitleSink};

use crate::routes::{Resolution, RouteMeta};
use crate::{HOME_PATH, LOGIN_PATH};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    Proceed,
    RedirectTo(String),
}

/// Redirect targets used by the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardPaths {
    pub home: String,
    pub login: String,
}

impl Default for GuardPaths {
    fn default() -> Self {
        Self {
            home: HOME_PATH.to_string(),
            login: LOGIN_PATH.to_string(),
        }
    }
}

/// Access decision for a matched chain (outermost first, leaf last).
///
/// `requires_auth` is inherited from any ancestor, `guest_only` is read
/// from the leaf only. The auth check runs first, so a route carrying both
/// flags sends a signed-out user to login instead of bouncing between
/// login and home.
pub fn decide<'a>(
    chain: impl IntoIterator<Item = &'a RouteMeta>,
    authenticated: bool,
    paths: &GuardPaths,
) -> NavigationDecision {
    let mut requires_auth = false;
    let mut leaf = None;
    for meta in chain {
        requires_auth |= meta.requires_auth;
        leaf = Some(meta);
    }
    let guest_only = leaf.is_some_and(|meta| meta.guest_only);

    if requires_auth && !authenticated {
        return NavigationDecision::RedirectTo(paths.login.clone());
    }

    if guest_only && authenticated {
        return NavigationDecision::RedirectTo(paths.home.clone());
    }

    NavigationDecision::Proceed
}

/// A guard decision plus the title the target would display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardOutcome {
    pub decision: NavigationDecision,
    pub title: String,
}

#[derive(Debug, Clone, Default)]
pub struct NavigationGuard {
    paths: GuardPaths,
    titles: TitleFormat,
}

impl NavigationGuard {
    pub fn new(paths: GuardPaths, titles: TitleFormat) -> Self {
        Self { paths, titles }
    }

    pub fn paths(&self) -> &GuardPaths {
        &self.paths
    }

    /// Decide what happens to a navigation towards `resolution`.
    ///
    /// Unmatched targets go home rather than to a blank view; redirect
    /// records send the user to their declared target.
    pub fn evaluate(&self, resolution: &Resolution, authenticated: bool) -> GuardOutcome {
        match resolution {
            Resolution::Matched(matched) => GuardOutcome {
                decision: decide(matched.metas(), authenticated, &self.paths),
                title: self
                    .titles
                    .format(matched.leaf().and_then(|leaf| leaf.meta.title.as_deref())),
            },
            Resolution::Redirect { to, .. } => GuardOutcome {
                decision: NavigationDecision::RedirectTo(to.clone()),
                title: self.titles.format(None),
            },
            Resolution::Unmatched { .. } => GuardOutcome {
                decision: NavigationDecision::RedirectTo(self.paths.home.clone()),
                title: self.titles.format(None),
            },
        }
    }
}
