//! Session token handling with redacted Debug output.

use crate::RedactError;

use std::fmt;

use serde::ser::Error;
use zeroize::Zeroize;

/// A session token that never exposes its value in logs or debug output.
///
/// Equality compares the underlying value so callers can detect whether the
/// session changed while a request was in flight.
#[derive(Clone, PartialEq, Eq)]
pub struct RedactedToken {
    inner: String,
}

impl RedactedToken {
    /// Wrap a token value.
    ///
    /// Returns `None` for an empty value: an empty token is no session.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let inner = token.into();
        if inner.is_empty() {
            None
        } else {
            Some(Self { inner })
        }
    }

    /// Get the actual token value for transmission or persistence.
    ///
    /// # Security Note
    /// Only call this when actually sending the token or writing it to storage.
    #[inline]
    pub fn expose(&self) -> &str {
        &self.inner
    }

    /// Get the token length (safe to log).
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for RedactedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RedactedToken([REDACTED])")
    }
}

impl fmt::Display for RedactedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED TOKEN]")
    }
}

impl Drop for RedactedToken {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

// Prevent accidental serialization
impl serde::Serialize for RedactedToken {
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Err(S::Error::custom(RedactError::refused("RedactedToken")))
    }
}
