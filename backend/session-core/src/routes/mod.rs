//! Declarative route table and path resolution.
//!
//! Route records are plain data. [`RouteRegistry::new`] flattens the nested
//! records into navigable entries, each carrying the chain of descriptors
//! from the outermost ancestor to the leaf, and rejects tables that are
//! misconfigured.

pub mod pattern;
pub mod table;

pub use pattern::PathPattern;
pub use table::default_routes;

use crate::error::RouteError;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Access and display metadata for one route record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub guest_only: bool,
    pub title: Option<String>,
}

impl RouteMeta {
    pub fn protected() -> Self {
        Self {
            requires_auth: true,
            ..Self::default()
        }
    }

    pub fn guest() -> Self {
        Self {
            guest_only: true,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn is_conflicting(&self) -> bool {
        self.requires_auth && self.guest_only
    }
}

/// One declared route, as written in the table.
#[derive(Debug, Clone)]
pub struct RouteRecord {
    pub path: String,
    pub name: Option<String>,
    pub meta: RouteMeta,
    pub redirect: Option<String>,
    pub children: Vec<RouteRecord>,
}

impl RouteRecord {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            meta: RouteMeta::default(),
            redirect: None,
            children: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.meta.title = Some(title.into());
        self
    }

    pub fn requires_auth(mut self) -> Self {
        self.meta.requires_auth = true;
        self
    }

    pub fn guest_only(mut self) -> Self {
        self.meta.guest_only = true;
        self
    }

    pub fn redirect_to(mut self, target: impl Into<String>) -> Self {
        self.redirect = Some(target.into());
        self
    }

    pub fn with_children(mut self, children: Vec<RouteRecord>) -> Self {
        self.children = children;
        self
    }
}

/// A route record after flattening: full path, immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: String,
    pub name: Option<String>,
    pub meta: RouteMeta,
    pub redirect: Option<String>,
}

/// A target that matched a navigable route.
#[derive(Debug, Clone)]
pub struct MatchedRoute {
    pub path: String,
    pub params: BTreeMap<String, String>,
    /// Outermost ancestor first, the matched leaf last. Never empty.
    pub chain: Vec<Arc<RouteDescriptor>>,
}

impl MatchedRoute {
    /// The record whose pattern matched.
    pub fn leaf(&self) -> Option<&RouteDescriptor> {
        self.chain.last().map(|descriptor| descriptor.as_ref())
    }

    pub fn metas(&self) -> impl Iterator<Item = &RouteMeta> {
        self.chain.iter().map(|descriptor| &descriptor.meta)
    }
}

#[derive(Debug, Clone)]
pub enum Resolution {
    Matched(MatchedRoute),
    /// The target hit a redirect record.
    Redirect { from: String, to: String },
    Unmatched { path: String },
}

impl Resolution {
    pub fn path(&self) -> &str {
        match self {
            Resolution::Matched(matched) => &matched.path,
            Resolution::Redirect { from, .. } => from,
            Resolution::Unmatched { path } => path,
        }
    }
}

#[derive(Debug)]
struct RouteEntry {
    pattern: PathPattern,
    chain: Vec<Arc<RouteDescriptor>>,
}

/// Compiled route table. Built once at startup.
#[derive(Debug)]
pub struct RouteRegistry {
    entries: Vec<RouteEntry>,
    descriptors: Vec<Arc<RouteDescriptor>>,
    by_name: HashMap<String, Arc<RouteDescriptor>>,
}

impl RouteRegistry {
    /// Flatten and compile `records`.
    ///
    /// Leaf records and redirect records become navigable; parents only
    /// lend their metadata to their children's chains. Matching is
    /// first-match in declaration order.
    ///
    /// # Errors
    ///
    /// - [`RouteError::ConflictingAccess`] if a record is both
    ///   `requires_auth` and `guest_only`
    /// - [`RouteError::InvalidPattern`] if a path does not compile
    /// - [`RouteError::DuplicateName`] if two records share a name
    pub fn new(records: Vec<RouteRecord>) -> Result<Self, RouteError> {
        let mut registry = Self {
            entries: Vec::new(),
            descriptors: Vec::new(),
            by_name: HashMap::new(),
        };

        for record in &records {
            registry.add_record(record, "", &[])?;
        }

        Ok(registry)
    }

    fn add_record(
        &mut self,
        record: &RouteRecord,
        parent_path: &str,
        parent_chain: &[Arc<RouteDescriptor>],
    ) -> Result<(), RouteError> {
        let path = join_path(parent_path, &record.path);

        if record.meta.is_conflicting() {
            return Err(RouteError::conflicting_access(path));
        }

        let descriptor = Arc::new(RouteDescriptor {
            path: path.clone(),
            name: record.name.clone(),
            meta: record.meta.clone(),
            redirect: record.redirect.clone(),
        });

        if let Some(name) = &record.name {
            if self.by_name.contains_key(name) {
                return Err(RouteError::duplicate_name(name));
            }
            self.by_name.insert(name.clone(), Arc::clone(&descriptor));
        }
        self.descriptors.push(Arc::clone(&descriptor));

        let mut chain = parent_chain.to_vec();
        chain.push(descriptor);

        if record.children.is_empty() || record.redirect.is_some() {
            self.entries.push(RouteEntry {
                pattern: PathPattern::compile(&path)?,
                chain: chain.clone(),
            });
        }

        for child in &record.children {
            self.add_record(child, &path, &chain)?;
        }

        Ok(())
    }

    /// Resolve a navigation target. Query string and fragment are ignored.
    pub fn resolve(&self, target: &str) -> Resolution {
        let path = normalize_target(target);

        for entry in &self.entries {
            let Some(params) = entry.pattern.matches(&path) else {
                continue;
            };

            if let Some(leaf) = entry.chain.last() {
                if let Some(to) = &leaf.redirect {
                    return Resolution::Redirect {
                        from: path,
                        to: to.clone(),
                    };
                }
            }

            return Resolution::Matched(MatchedRoute {
                path,
                params,
                chain: entry.chain.clone(),
            });
        }

        Resolution::Unmatched { path }
    }

    /// Full path of a named route.
    pub fn path_for(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(|descriptor| descriptor.path.as_str())
    }

    /// Every declared record, in declaration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &RouteDescriptor> {
        self.descriptors.iter().map(|descriptor| descriptor.as_ref())
    }
}

/// Strip query and fragment and make sure the path is absolute.
pub fn normalize_target(target: &str) -> String {
    let end = target.find(['?', '#']).unwrap_or(target.len());
    let path = target[..end].trim();

    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

fn join_path(parent: &str, child: &str) -> String {
    if child.starts_with('/') {
        return child.to_string();
    }
    if child.is_empty() {
        return if parent.is_empty() {
            String::from("/")
        } else {
            parent.to_string()
        };
    }
    format!("{}/{}", parent.trim_end_matches('/'), child)
}
