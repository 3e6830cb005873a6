// Test doubles shared by the unit tests

use crate::error::TransportError;
use crate::router::Navigator;
use crate::transport::{AuthTransport, Credentials, LoginResponse};

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

type CheckHook = Box<dyn Fn() + Send + Sync>;

/// Transport that replays queued answers and counts calls.
///
/// An empty queue answers with a timeout.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    login_results: Mutex<VecDeque<Result<LoginResponse, TransportError>>>,
    check_results: Mutex<VecDeque<Result<(), TransportError>>>,
    login_calls: AtomicUsize,
    check_calls: AtomicUsize,
    login_gate: Option<Arc<Notify>>,
    check_hook: Option<CheckHook>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn login_ok(self, token: &str) -> Self {
        self.push_login(Ok(LoginResponse {
            token: token.to_string(),
        }))
    }

    pub(crate) fn login_status(self, status: u16) -> Self {
        self.push_login(Err(TransportError::status("login", status)))
    }

    pub(crate) fn push_login(self, result: Result<LoginResponse, TransportError>) -> Self {
        self.login_results.lock().unwrap().push_back(result);
        self
    }

    pub(crate) fn check_ok(self) -> Self {
        self.push_check(Ok(()))
    }

    pub(crate) fn check_status(self, status: u16) -> Self {
        self.push_check(Err(TransportError::status("check-auth", status)))
    }

    pub(crate) fn push_check(self, result: Result<(), TransportError>) -> Self {
        self.check_results.lock().unwrap().push_back(result);
        self
    }

    /// Login calls wait until `gate` is notified.
    pub(crate) fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.login_gate = Some(gate);
        self
    }

    /// Runs while the check-auth call is "on the wire".
    pub(crate) fn on_check(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.check_hook = Some(Box::new(hook));
        self
    }

    pub(crate) fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn check_calls(&self) -> usize {
        self.check_calls.load(Ordering::SeqCst)
    }
}

impl AuthTransport for ScriptedTransport {
    async fn login(&self, _credentials: &Credentials) -> Result<LoginResponse, TransportError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.login_gate {
            gate.notified().await;
        }
        let next = self.login_results.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(TransportError::timeout("login")))
    }

    async fn check_auth(&self) -> Result<(), TransportError> {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(hook) = &self.check_hook {
            hook();
        }
        let next = self.check_results.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(TransportError::timeout("check-auth")))
    }
}

/// Navigator that only records what it was asked to do.
#[derive(Default)]
pub(crate) struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub(crate) fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visited.lock().unwrap().push(path.to_string());
    }
}

/// Storage whose removals always fail, and whose writes fail too unless
/// built with [`FailingStorage::removals_only`].
///
/// [`FailingStorage::holding`] makes reads return a token left by an earlier run.
#[derive(Default)]
pub(crate) struct FailingStorage {
    accepts_writes: bool,
    persisted: Option<String>,
}

impl FailingStorage {
    pub(crate) fn removals_only() -> Self {
        Self {
            accepts_writes: true,
            persisted: None,
        }
    }

    pub(crate) fn holding(token: &str) -> Self {
        Self {
            accepts_writes: false,
            persisted: Some(token.to_string()),
        }
    }
}

impl crate::storage::TokenStorage for FailingStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, crate::error::StorageError> {
        Ok(self.persisted.clone())
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), crate::error::StorageError> {
        if self.accepts_writes {
            Ok(())
        } else {
            Err(write_failure())
        }
    }

    fn remove(&self, _key: &str) -> Result<(), crate::error::StorageError> {
        Err(write_failure())
    }
}

fn write_failure() -> crate::error::StorageError {
    crate::error::StorageError::Write {
        location: common::ErrorLocation::from(std::panic::Location::caller()),
        path: std::path::PathBuf::from("/read-only/storage.json"),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
    }
}
