use crate::HOME_PATH;
use crate::routes::RouteRecord;

/// The panel's route table.
///
/// The root layout is protected and its children inherit that through the
/// matched chain. The login view is guest-only and anything unknown goes
/// back home.
pub fn default_routes() -> Vec<RouteRecord> {
    vec![
        RouteRecord::new("/").requires_auth().with_children(vec![
            RouteRecord::new("").named("Home").title("Clients"),
            RouteRecord::new("/profile").named("Profile").title("Profile"),
            RouteRecord::new("/settings").named("Settings").title("Settings"),
        ]),
        RouteRecord::new("/login")
            .named("Login")
            .title("Login")
            .guest_only(),
        RouteRecord::new("/:pathMatch(.*)*").redirect_to(HOME_PATH),
    ]
}
