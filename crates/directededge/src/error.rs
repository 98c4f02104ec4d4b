//! Error types for the Directed Edge item client.

use thiserror::Error;

/// Error while parsing an XML document returned by the server.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("malformed XML at byte {position}: {message}")]
    Malformed { position: u64, message: String },

    #[error("document length {len} exceeds maximum {max}")]
    DocumentTooLarge { len: usize, max: usize },

    #[error("expected root element <{expected}>, found <{found}>")]
    UnexpectedRoot { expected: &'static str, found: String },

    #[error("missing <{element}> element")]
    MissingElement { element: &'static str },

    #[error("<{element}> is missing required attribute `{attribute}`")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("invalid value {value:?} for attribute `{attribute}` of <{element}>")]
    InvalidAttribute {
        element: String,
        attribute: &'static str,
        value: String,
    },

    #[error("document contains more than one <item> element")]
    MultipleItems,

    #[error("document contains more than one root element")]
    MultipleRoots,
}

/// Error while serializing an item document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("XML writer failed: {0}")]
    Write(String),

    #[error("generated document is not valid UTF-8")]
    InvalidUtf8,
}

/// Error raised by a [`Transport`](crate::transport::Transport).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    #[error("invalid resource URL {url:?}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("{method} {url} returned HTTP {status}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
    },

    #[error("response from {url} is {len} bytes, maximum is {max}")]
    BodyTooLarge { url: String, len: u64, max: usize },

    #[error("no resource at {path}")]
    NotFound { path: String },
}

/// Error resolving a field by name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("unknown item field `{name}`")]
    Unknown { name: String },
}

/// Any error surfaced by [`Item`](crate::Item) and [`Database`](crate::Database).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Field(#[from] FieldError),
}

impl Error {
    /// Returns true if the error came from the network layer rather than
    /// from local parsing or serialization.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        let err: Error = TransportError::NotFound { path: "db/items/a".into() }.into();
        assert!(err.is_transport());

        let err: Error = DecodeError::MultipleItems.into();
        assert!(!err.is_transport());
    }

    #[test]
    fn test_messages() {
        let err = TransportError::Status {
            method: "PUT",
            url: "https://example.com/db/items/a".into(),
            status: 503,
        };
        assert_eq!(
            err.to_string(),
            "PUT https://example.com/db/items/a returned HTTP 503"
        );

        let err = FieldError::Unknown { name: "colour".into() };
        assert_eq!(err.to_string(), "unknown item field `colour`");
    }
}
