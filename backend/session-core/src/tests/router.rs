// Unit tests for the Router: redirects, titles, history and the Navigator seam

use crate::error::NavigationError;
use crate::guard::{DocumentTitle, NavigationGuard};
use crate::router::{HISTORY_CAPACITY, Navigator, Router};
use crate::routes::{RouteRecord, RouteRegistry, default_routes};
use crate::session::{AuthStatus, SessionState};
use crate::storage::MemoryStorage;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex};
use std::thread;

/// Signed-in status whose first read parks until released, so a second
/// navigation can start while the first is between resolve and commit.
struct ParkedAuth {
    parked: AtomicBool,
    entered: Mutex<Sender<()>>,
    release: Mutex<Receiver<()>>,
}

impl AuthStatus for ParkedAuth {
    fn is_authenticated(&self) -> bool {
        if !self.parked.swap(true, Ordering::SeqCst) {
            self.entered.lock().unwrap().send(()).unwrap();
            self.release.lock().unwrap().recv().unwrap();
        }
        true
    }
}

struct Harness {
    router: Router,
    session: Arc<SessionState>,
    title: Arc<DocumentTitle>,
}

fn harness_with(records: Vec<RouteRecord>) -> Harness {
    let session = Arc::new(SessionState::new(Arc::new(MemoryStorage::new())));
    let title = Arc::new(DocumentTitle::new());
    let router = Router::new(
        RouteRegistry::new(records).unwrap(),
        NavigationGuard::default(),
        session.clone(),
        title.clone(),
    );

    Harness { router, session, title }
}

fn harness() -> Harness {
    harness_with(default_routes())
}

/// **VALUE**: The end-to-end scenario: a protected page while signed out.
///
/// **WHY THIS MATTERS**: The user must land on the login view, and the title
/// must never flash the name of a page they aren't allowed to see.
///
/// **BUG THIS CATCHES**: Would catch the title being applied for the requested
/// target before the guard's redirect is followed.
#[test]
fn given_signed_out_when_navigating_to_settings_then_redirected_to_login_without_settings_title() {
    let h = harness();

    let navigation = h.router.push("/settings").unwrap();

    assert_eq!(navigation.path, "/login");
    assert_eq!(navigation.redirected_from.as_deref(), Some("/settings"));
    assert_eq!(h.router.current().as_deref(), Some("/login"));
    assert_eq!(h.title.get(), "Antizapret | Login");
    assert!(!h.title.get().contains("Settings"));
}

#[test]
fn given_signed_in_when_navigating_to_login_then_redirected_home() {
    let h = harness();
    h.session.set_token(Some("abc")).unwrap();

    let navigation = h.router.push("/login").unwrap();

    assert_eq!(navigation.path, "/");
    assert_eq!(navigation.redirected_from.as_deref(), Some("/login"));
    assert_eq!(h.title.get(), "Antizapret | Clients");
}

#[test]
fn given_signed_in_when_navigating_to_settings_then_proceeds_with_title() {
    let h = harness();
    h.session.set_token(Some("abc")).unwrap();

    let navigation = h.router.push("/settings").unwrap();

    assert_eq!(navigation.path, "/settings");
    assert!(navigation.redirected_from.is_none());
    assert_eq!(navigation.title, "Antizapret | Settings");
    assert_eq!(h.title.get(), "Antizapret | Settings");
}

/// **VALUE**: Verifies unknown paths end up at home (or login, if signed out).
///
/// **WHY THIS MATTERS**: A mistyped URL must never strand the user on a blank view.
///
/// **BUG THIS CATCHES**: Would catch unmatched paths surfacing as errors.
#[test]
fn given_unknown_path_when_navigating_then_falls_back_through_home() {
    let h = harness();

    let signed_out = h.router.push("/no/such/page").unwrap();
    assert_eq!(signed_out.path, "/login");

    h.session.set_token(Some("abc")).unwrap();
    let signed_in = h.router.push("/no/such/page").unwrap();
    assert_eq!(signed_in.path, "/");
    assert_eq!(signed_in.redirected_from.as_deref(), Some("/no/such/page"));
}

#[test]
fn given_table_without_fallback_when_navigating_unknown_then_guard_sends_home() {
    let h = harness_with(vec![RouteRecord::new("/").title("Home"), RouteRecord::new("/login").guest_only()]);

    let navigation = h.router.push("/missing").unwrap();

    assert_eq!(navigation.path, "/");
    assert_eq!(h.title.get(), "Antizapret | Home");
}

/// **VALUE**: Verifies a token change is visible to the very next navigation.
///
/// **WHY THIS MATTERS**: After logout the next navigation must be guarded with
/// the new state, never a snapshot taken before `set_token`.
///
/// **BUG THIS CATCHES**: Would catch the router caching the authentication flag.
#[test]
fn given_token_cleared_when_navigating_again_then_guard_sees_new_state() {
    let h = harness();
    h.session.set_token(Some("abc")).unwrap();
    assert_eq!(h.router.push("/profile").unwrap().path, "/profile");

    h.session.set_token(None).unwrap();

    assert_eq!(h.router.push("/profile").unwrap().path, "/login");
}

/// **VALUE**: Verifies a redirect cycle ends in an error instead of spinning.
///
/// **WHY THIS MATTERS**: A table mistake must not hang the client.
///
/// **BUG THIS CATCHES**: Would catch the hop counter being removed.
#[test]
fn given_redirect_cycle_when_navigating_then_redirect_loop_error() {
    let h = harness_with(vec![
        RouteRecord::new("/a").redirect_to("/b"),
        RouteRecord::new("/b").redirect_to("/a"),
    ]);

    let result = h.router.push("/a");

    assert!(matches!(result, Err(NavigationError::RedirectLoop { hops: 10, .. })), "{result:?}");
    assert!(h.router.current().is_none(), "nothing should be committed");
}

#[test]
fn given_low_redirect_limit_when_chain_is_longer_then_redirect_loop_error() {
    let session = Arc::new(SessionState::new(Arc::new(MemoryStorage::new())));
    let router = Router::new(
        RouteRegistry::new(vec![
            RouteRecord::new("/a").redirect_to("/b"),
            RouteRecord::new("/b").redirect_to("/c"),
            RouteRecord::new("/c"),
        ])
        .unwrap(),
        NavigationGuard::default(),
        session,
        Arc::new(DocumentTitle::new()),
    )
    .with_max_redirects(1);

    assert!(router.push("/b").is_ok());
    assert!(matches!(router.push("/a"), Err(NavigationError::RedirectLoop { .. })));
}

#[test]
fn given_several_navigations_when_reading_history_then_committed_paths_in_order() {
    let h = harness();

    h.router.push("/settings").unwrap();
    h.session.set_token(Some("abc")).unwrap();
    h.router.push("/settings").unwrap();
    h.router.push("/profile?tab=keys").unwrap();

    assert_eq!(h.router.history(), vec!["/login", "/settings", "/profile"]);
    assert_eq!(h.router.current().as_deref(), Some("/profile"));
}

#[test]
fn given_more_navigations_than_capacity_when_reading_history_then_oldest_dropped() {
    let h = harness();
    h.session.set_token(Some("abc")).unwrap();

    h.router.push("/settings").unwrap();
    for _ in 0..HISTORY_CAPACITY {
        h.router.push("/profile").unwrap();
    }

    let history = h.router.history();
    assert_eq!(history.len(), HISTORY_CAPACITY);
    assert!(history.iter().all(|path| path == "/profile"), "oldest entry should be gone");
}

#[test]
fn given_router_as_navigator_when_navigate_then_commits() {
    let h = harness();
    let navigator: &dyn Navigator = &h.router;

    navigator.navigate("/login");

    assert_eq!(h.router.current().as_deref(), Some("/login"));
}

/// **VALUE**: Verifies the last navigation wins when two overlap.
///
/// **WHY THIS MATTERS**: A slow navigation that finishes after a newer one must
/// not drag the user back to where they were heading before.
///
/// **BUG THIS CATCHES**: Would catch the generation check in `commit` being
/// removed, or the generation being taken after the guard has run.
#[test]
fn given_newer_push_started_when_older_push_commits_then_older_superseded() {
    // GIVEN: A router whose first auth check blocks mid-navigation
    let (entered_tx, entered_rx) = channel();
    let (release_tx, release_rx) = channel();
    let auth = Arc::new(ParkedAuth {
        parked: AtomicBool::new(false),
        entered: Mutex::new(entered_tx),
        release: Mutex::new(release_rx),
    });
    let title = Arc::new(DocumentTitle::new());
    let router = Arc::new(Router::new(
        RouteRegistry::new(default_routes()).unwrap(),
        NavigationGuard::default(),
        auth,
        title.clone(),
    ));

    // WHEN: /profile starts, then /settings starts and finishes before it
    let older_router = router.clone();
    let older = thread::spawn(move || older_router.push("/profile"));
    entered_rx.recv().unwrap();

    let newer = router.push("/settings").unwrap();
    release_tx.send(()).unwrap();
    let older = older.join().unwrap();

    // THEN: The older navigation is dropped and the newer one stays committed
    assert_eq!(newer.path, "/settings");
    assert!(
        matches!(&older, Err(NavigationError::Superseded { path, .. }) if path == "/profile"),
        "{older:?}"
    );
    assert_eq!(router.current().as_deref(), Some("/settings"));
    assert_eq!(router.history(), vec!["/settings"]);
    assert_eq!(title.get(), "Antizapret | Settings");
}
