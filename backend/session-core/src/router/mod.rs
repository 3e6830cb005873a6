//! Drives navigations: resolve, ask the guard, follow redirects, commit.
//!
//! The router reads the session only through [`AuthStatus`], and the
//! session store reaches the router only through [`Navigator`]; neither
//! depends on the other's concrete type.

use crate::error::NavigationError;
use crate::guard::{NavigationDecision, NavigationGuard, TitleSink};
use crate::routes::{Resolution, RouteRegistry, normalize_target};
use crate::session::AuthStatus;

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, info, warn};

pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Committed locations kept by [`Router::history`]; older ones are dropped.
pub const HISTORY_CAPACITY: usize = 100;

/// Something that can be asked to navigate.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// A committed navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub path: String,
    pub params: BTreeMap<String, String>,
    /// The originally requested path when the guard redirected.
    pub redirected_from: Option<String>,
    pub title: String,
}

#[derive(Debug, Default)]
struct Location {
    current: Option<String>,
    history: VecDeque<String>,
}

pub struct Router {
    registry: RouteRegistry,
    guard: NavigationGuard,
    session: Arc<dyn AuthStatus>,
    title_sink: Arc<dyn TitleSink>,
    max_redirects: usize,
    generation: AtomicU64,
    location: Mutex<Location>,
}

impl Router {
    pub fn new(
        registry: RouteRegistry,
        guard: NavigationGuard,
        session: Arc<dyn AuthStatus>,
        title_sink: Arc<dyn TitleSink>,
    ) -> Self {
        Self {
            registry,
            guard,
            session,
            title_sink,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            generation: AtomicU64::new(0),
            location: Mutex::new(Location::default()),
        }
    }

    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    /// Navigate to `target`, following guard redirects.
    ///
    /// The session flag is read afresh at every hop. Only the location that
    /// is finally committed gets its title applied.
    ///
    /// # Errors
    ///
    /// - [`NavigationError::RedirectLoop`] after more than `max_redirects` hops
    /// - [`NavigationError::Superseded`] if a newer navigation started first
    pub fn push(&self, target: &str) -> Result<Navigation, NavigationError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let requested = normalize_target(target);
        let mut current_target = requested.clone();
        let mut hops = 0;

        loop {
            let resolution = self.registry.resolve(&current_target);
            let outcome = self
                .guard
                .evaluate(&resolution, self.session.is_authenticated());

            match outcome.decision {
                NavigationDecision::Proceed => {
                    let params = match resolution {
                        Resolution::Matched(matched) => matched.params,
                        _ => BTreeMap::new(),
                    };
                    let navigation = Navigation {
                        redirected_from: (current_target != requested).then(|| requested.clone()),
                        path: current_target,
                        params,
                        title: outcome.title,
                    };
                    return self.commit(generation, navigation);
                }
                NavigationDecision::RedirectTo(next) => {
                    hops += 1;
                    if hops > self.max_redirects {
                        warn!("Navigation to '{requested}' exceeded {} redirects", self.max_redirects);
                        return Err(NavigationError::redirect_loop(requested, self.max_redirects));
                    }
                    debug!("Navigation to '{current_target}' redirected to '{next}'");
                    current_target = normalize_target(&next);
                }
            }
        }
    }

    fn commit(&self, generation: u64, navigation: Navigation) -> Result<Navigation, NavigationError> {
        let mut location = self.location.lock().unwrap_or_else(PoisonError::into_inner);

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Navigation to '{}' superseded", navigation.path);
            return Err(NavigationError::superseded(navigation.path));
        }

        location.current = Some(navigation.path.clone());
        if location.history.len() == HISTORY_CAPACITY {
            location.history.pop_front();
        }
        location.history.push_back(navigation.path.clone());
        self.title_sink.set_title(&navigation.title);

        match &navigation.redirected_from {
            Some(from) => info!("Navigated to '{}' (redirected from '{from}')", navigation.path),
            None => info!("Navigated to '{}'", navigation.path),
        }

        Ok(navigation)
    }

    /// The last committed location.
    pub fn current(&self) -> Option<String> {
        self.location
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current
            .clone()
    }

    /// The last [`HISTORY_CAPACITY`] committed locations, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.location
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .history
            .iter()
            .cloned()
            .collect()
    }
}

impl Navigator for Router {
    fn navigate(&self, path: &str) {
        if let Err(e) = self.push(path) {
            warn!("Navigation to '{path}' failed: {e}");
        }
    }
}
