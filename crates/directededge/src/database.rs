//! Handle on a remote Directed Edge database.

use std::fmt;
use std::sync::Arc;

use crate::config::ClientOptions;
use crate::error::Error;
use crate::item::Item;
use crate::transport::{HttpTransport, ResourcePath, Transport};

/// Segment under the database resource holding its items.
const ITEMS_SEGMENT: &str = "items";

/// A named database reachable through a [`Transport`].
///
/// Cheap to clone; every [`Item`] keeps its own clone.
#[derive(Clone)]
pub struct Database {
    name: String,
    transport: Arc<dyn Transport>,
}

impl Database {
    /// Creates a handle using `transport`.
    pub fn new(name: impl Into<String>, transport: impl Transport + 'static) -> Self {
        Self::with_shared(name, Arc::new(transport))
    }

    /// Creates a handle sharing an existing transport.
    pub fn with_shared(name: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            name: name.into(),
            transport,
        }
    }

    /// Creates a handle talking HTTP with `options`.
    pub fn connect(name: impl Into<String>, options: &ClientOptions) -> Result<Self, Error> {
        Ok(Self::new(name, HttpTransport::new(options)?))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resource of the database itself.
    pub fn resource(&self) -> ResourcePath {
        ResourcePath::root(self.name.clone())
    }

    /// Resource of the item `id`.
    pub fn item_path(&self, id: &str) -> ResourcePath {
        self.resource().child(ITEMS_SEGMENT).child(id)
    }

    /// Returns an item handle. No request is made.
    pub fn item(&self, id: impl ToString) -> Item {
        Item::new(self, id)
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
