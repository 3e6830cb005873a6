//! Shared primitives for the panel workspace.
//!
//! This crate holds the small building blocks every other crate leans on:
//! error call-site capture, HTTP status classification and the redacted
//! session token wrapper. It has no business logic.
//!
//! ## Architecture
//!
//! - **common** (this crate): Primitives shared across layers
//! - **session-core**: Session store, route registry, guard and router
//! - **panel**: Binary wiring everything together

pub mod error;
pub mod http_status;
pub mod redacted_token;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_token::RedactedToken;
