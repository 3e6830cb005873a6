// Unit tests for route patterns, the registry and the default table

use crate::error::RouteError;
use crate::routes::{PathPattern, Resolution, RouteMeta, RouteRecord, RouteRegistry, default_routes, normalize_target};

fn registry() -> RouteRegistry {
    RouteRegistry::new(default_routes()).expect("default table should be valid")
}

fn matched(resolution: Resolution) -> crate::routes::MatchedRoute {
    match resolution {
        Resolution::Matched(matched) => matched,
        other => panic!("expected a match, got {other:?}"),
    }
}

// ----------------------------------------------------------------------------
// PathPattern
// ----------------------------------------------------------------------------

#[test]
fn given_static_pattern_when_matching_then_exact_with_optional_trailing_slash() {
    let pattern = PathPattern::compile("/settings").unwrap();

    assert!(pattern.matches("/settings").is_some());
    assert!(pattern.matches("/settings/").is_some());
    assert!(pattern.matches("/settings/extra").is_none());
    assert!(pattern.matches("/setting").is_none());
}

#[test]
fn given_param_pattern_when_matching_then_captures_single_segment() {
    let pattern = PathPattern::compile("/clients/:id").unwrap();

    let params = pattern.matches("/clients/42").unwrap();

    assert_eq!(params.get("id").map(String::as_str), Some("42"));
    assert!(pattern.matches("/clients/42/edit").is_none());
    assert!(pattern.matches("/clients").is_none());
}

/// **VALUE**: Verifies the catch-all syntax matches any depth, including nothing.
///
/// **WHY THIS MATTERS**: The fallback record is what keeps users off blank views.
/// If it fails to match deep paths they land nowhere.
///
/// **BUG THIS CATCHES**: Would catch the custom pattern being ignored in favour
/// of the single-segment default.
#[test]
fn given_catch_all_pattern_when_matching_then_matches_any_depth() {
    let pattern = PathPattern::compile("/:pathMatch(.*)*").unwrap();

    assert!(pattern.matches("/").is_some());
    assert_eq!(
        pattern.matches("/a/b/c").unwrap().get("pathMatch").map(String::as_str),
        Some("a/b/c")
    );
}

#[test]
fn given_regex_metacharacters_in_static_segment_when_matching_then_literal() {
    let pattern = PathPattern::compile("/v1.0/items").unwrap();

    assert!(pattern.matches("/v1.0/items").is_some());
    assert!(pattern.matches("/v1x0/items").is_none());
}

#[test]
fn given_malformed_patterns_when_compiling_then_invalid_pattern() {
    assert!(matches!(PathPattern::compile("/:"), Err(RouteError::InvalidPattern { .. })));
    assert!(matches!(PathPattern::compile("/:id()"), Err(RouteError::InvalidPattern { .. })));
    assert!(matches!(PathPattern::compile("/:id([)"), Err(RouteError::InvalidPattern { .. })));
    assert!(matches!(PathPattern::compile("/:id/:id"), Err(RouteError::InvalidPattern { .. })));
}

// ----------------------------------------------------------------------------
// RouteRegistry
// ----------------------------------------------------------------------------

/// **VALUE**: Verifies children inherit their parent in the matched chain.
///
/// **WHY THIS MATTERS**: Only the root layout declares `requires_auth`. If the
/// chain loses the parent, every child page becomes public.
///
/// **BUG THIS CATCHES**: Would catch chains built from the leaf alone.
#[test]
fn given_default_table_when_resolving_child_then_chain_includes_protected_parent() {
    let settings = matched(registry().resolve("/settings"));

    assert_eq!(settings.chain.len(), 2);
    assert!(settings.chain[0].meta.requires_auth);
    assert!(!settings.chain[1].meta.requires_auth);
    assert_eq!(settings.leaf().unwrap().meta.title.as_deref(), Some("Settings"));
}

#[test]
fn given_default_table_when_resolving_root_then_matches_home_child() {
    let home = matched(registry().resolve("/"));

    assert_eq!(home.leaf().unwrap().name.as_deref(), Some("Home"));
    assert_eq!(home.leaf().unwrap().meta.title.as_deref(), Some("Clients"));
    assert!(home.metas().any(|meta| meta.requires_auth));
}

#[test]
fn given_default_table_when_resolving_login_then_guest_only_leaf() {
    let login = matched(registry().resolve("/login?next=/settings#top"));

    assert_eq!(login.path, "/login");
    assert_eq!(login.chain.len(), 1);
    assert!(login.chain[0].meta.guest_only);
}

#[test]
fn given_unknown_path_when_resolving_default_table_then_catch_all_redirects_home() {
    match registry().resolve("/does/not/exist") {
        Resolution::Redirect { from, to } => {
            assert_eq!(from, "/does/not/exist");
            assert_eq!(to, "/");
        }
        other => panic!("expected redirect, got {other:?}"),
    }
}

#[test]
fn given_table_without_fallback_when_resolving_unknown_then_unmatched() {
    let registry = RouteRegistry::new(vec![RouteRecord::new("/login").guest_only()]).unwrap();

    assert!(matches!(registry.resolve("/nowhere"), Resolution::Unmatched { .. }));
}

/// **VALUE**: Verifies a record with both access flags is rejected up front.
///
/// **WHY THIS MATTERS**: "Must be signed in" and "must be signed out" on the
/// same route can never both hold; it's a table bug that should fail at startup.
///
/// **BUG THIS CATCHES**: Would catch the conflict check being dropped from the
/// registry builder.
#[test]
fn given_conflicting_flags_when_building_registry_then_conflicting_access() {
    let records = vec![RouteRecord::new("/weird").requires_auth().guest_only()];

    let result = RouteRegistry::new(records);

    assert!(matches!(result, Err(RouteError::ConflictingAccess { ref path, .. }) if path == "/weird"));
}

#[test]
fn given_duplicate_names_when_building_registry_then_duplicate_name() {
    let records = vec![
        RouteRecord::new("/a").named("Same"),
        RouteRecord::new("/b").named("Same"),
    ];

    assert!(matches!(RouteRegistry::new(records), Err(RouteError::DuplicateName { .. })));
}

#[test]
fn given_nested_relative_children_when_building_then_paths_are_joined() {
    let registry = RouteRegistry::new(vec![
        RouteRecord::new("/admin")
            .meta(RouteMeta::protected())
            .with_children(vec![
                RouteRecord::new("users").named("Users"),
                RouteRecord::new("users/:id").named("User"),
            ]),
    ])
    .unwrap();

    assert_eq!(registry.path_for("Users"), Some("/admin/users"));
    assert_eq!(registry.path_for("User"), Some("/admin/users/:id"));
    assert_eq!(registry.path_for("Missing"), None);

    let user = matched(registry.resolve("/admin/users/7"));
    assert_eq!(user.params.get("id").map(String::as_str), Some("7"));
    assert_eq!(user.chain.len(), 2);
}

#[test]
fn given_parent_with_children_when_resolving_parent_path_then_not_navigable_by_itself() {
    let registry = RouteRegistry::new(vec![
        RouteRecord::new("/admin").with_children(vec![RouteRecord::new("users")]),
    ])
    .unwrap();

    assert!(matches!(registry.resolve("/admin"), Resolution::Unmatched { .. }));
}

#[test]
fn given_default_table_when_listing_descriptors_then_declaration_order() {
    let registry = registry();
    let paths: Vec<&str> = registry.descriptors().map(|d| d.path.as_str()).collect();

    assert_eq!(paths, vec!["/", "/", "/profile", "/settings", "/login", "/:pathMatch(.*)*"]);
}

#[test]
fn given_various_targets_when_normalizing_then_absolute_without_query() {
    assert_eq!(normalize_target("settings"), "/settings");
    assert_eq!(normalize_target("/login?next=/"), "/login");
    assert_eq!(normalize_target("/profile#section"), "/profile");
    assert_eq!(normalize_target(""), "/");
}
