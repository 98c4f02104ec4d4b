//! In-process transport with canned responses and a request log.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::TransportError;
use crate::transport::{ResourcePath, Transport};

/// HTTP method of a [`RecordedRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Post,
}

/// One request seen by a [`MemoryTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    /// The rendered [`ResourcePath`], e.g. `db/items/a?update_method=add`.
    pub path: String,
    pub body: Option<String>,
}

#[derive(Debug, Default)]
struct State {
    bodies: HashMap<String, String>,
    failures: HashMap<String, u16>,
    requests: Vec<RecordedRequest>,
}

/// A [`Transport`] serving GET bodies from memory and recording every call.
///
/// Clones share state, so a test can keep one handle while a
/// [`Database`](crate::Database) owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    state: Arc<Mutex<State>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` for GET requests on `path`.
    pub fn with_body(self, path: impl Into<String>, body: impl Into<String>) -> Self {
        self.set_body(path, body);
        self
    }

    pub fn set_body(&self, path: impl Into<String>, body: impl Into<String>) {
        self.lock().bodies.insert(path.into(), body.into());
    }

    /// Makes every request on `path` fail with `status`.
    pub fn fail_with(&self, path: impl Into<String>, status: u16) {
        self.lock().failures.insert(path.into(), status);
    }

    /// Every request seen so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// PUT and POST requests seen so far.
    pub fn writes(&self) -> Vec<RecordedRequest> {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method != Method::Get)
            .cloned()
            .collect()
    }

    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(
        &self,
        method: Method,
        path: &ResourcePath,
        body: Option<String>,
    ) -> Result<MutexGuard<'_, State>, TransportError> {
        let path = path.to_string();
        let mut state = self.lock();
        state.requests.push(RecordedRequest {
            method,
            path: path.clone(),
            body,
        });
        if let Some(&status) = state.failures.get(&path) {
            let method = match method {
                Method::Get => "GET",
                Method::Put => "PUT",
                Method::Post => "POST",
            };
            return Err(TransportError::Status {
                method,
                url: path,
                status,
            });
        }
        Ok(state)
    }
}

impl Transport for MemoryTransport {
    fn get(&self, path: &ResourcePath) -> Result<String, TransportError> {
        let state = self.record(Method::Get, path, None)?;
        state
            .bodies
            .get(&path.to_string())
            .cloned()
            .ok_or_else(|| TransportError::NotFound {
                path: path.to_string(),
            })
    }

    fn put(&self, path: &ResourcePath, body: String) -> Result<(), TransportError> {
        self.record(Method::Put, path, Some(body)).map(drop)
    }

    fn post(&self, path: &ResourcePath, body: String) -> Result<(), TransportError> {
        self.record(Method::Post, path, Some(body)).map(drop)
    }
}
