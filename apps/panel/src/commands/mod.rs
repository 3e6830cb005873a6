//! Panel commands. Each one works on an already wired [`AppState`].
//!
//! [`AppState`]: crate::state::AppState

pub mod navigation;
pub mod session;

pub use navigation::{NavigationReport, RouteSummary};
pub use session::StatusReport;
