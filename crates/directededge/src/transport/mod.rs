//! Addressed-resource transport.
//!
//! The item talks to the server only through the [`Transport`] trait, so
//! the HTTP client can be swapped for [`MemoryTransport`] in tests.

pub mod http;
pub mod memory;

pub use http::HttpTransport;
pub use memory::{Method, MemoryTransport, RecordedRequest};

use std::fmt;

use crate::error::TransportError;
use crate::model::QueryOptions;

/// Location of a remote resource relative to the API root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ResourcePath {
    segments: Vec<String>,
    query: Vec<(String, String)>,
}

impl ResourcePath {
    /// Creates a path with a single segment.
    pub fn root(segment: impl Into<String>) -> Self {
        Self {
            segments: vec![segment.into()],
            query: Vec::new(),
        }
    }

    /// Narrows to a sub-resource.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.segments.push(segment.into());
        path
    }

    /// Sets a query parameter, replacing an earlier value for `key`.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.query.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.query.push((key, value)),
        }
        self
    }

    /// Sets every parameter of `options`.
    pub fn with_options(self, options: &QueryOptions) -> Self {
        options
            .iter()
            .fold(self, |path, (k, v)| path.with_query(k, v))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))?;
        for (i, (k, v)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{k}={v}")?;
        }
        Ok(())
    }
}

/// Blocking client for addressed resources.
///
/// Implementations report non-success responses as errors; callers never
/// see a status code.
pub trait Transport: Send + Sync {
    /// Fetches the body of `path`.
    fn get(&self, path: &ResourcePath) -> Result<String, TransportError>;

    /// Replaces the resource at `path` with `body`.
    fn put(&self, path: &ResourcePath, body: String) -> Result<(), TransportError>;

    /// Posts `body` to `path`.
    fn post(&self, path: &ResourcePath, body: String) -> Result<(), TransportError>;
}
