//! Client for items of a Directed Edge recommendation database.
//!
//! This crate lets a caller read and mutate one node ("item") of a remote
//! recommendation graph: its links, tags, properties and its preselected and
//! blacklisted lists. Changes are batched locally and flushed to the REST
//! API in its XML dialect.
//!
//! # Overview
//!
//! - **Deferred**: constructing an item or mutating it never touches the
//!   network; the first read fetches the item once
//! - **Diffable**: every field tracks additions and removals separately, so
//!   a save sends only what changed
//! - **Memoized**: `related` / `recommended` results are cached per options
//!
//! # Quick Start
//!
//! ```rust
//! use directededge::{Database, LinkOptions, MemoryTransport, QueryOptions};
//!
//! let transport = MemoryTransport::new().with_body(
//!     "shop/items/customer1/recommended?maxResults=2",
//!     r#"<directededge version="0.1"><item id="customer1">
//!          <recommended>product7</recommended>
//!          <recommended>product2</recommended>
//!        </item></directededge>"#,
//! );
//! let db = Database::new("shop", transport.clone());
//!
//! let mut customer = db.item("customer1");
//! customer.links_mut().add_with("product3", LinkOptions::new().weight(4));
//! customer.tags_mut().add("customer");
//! customer.set_property("city", "Berlin");
//! customer.save().unwrap();
//!
//! let recs = customer
//!     .recommended(&QueryOptions::new().max_results(2))
//!     .unwrap();
//! assert_eq!(recs[0].id, "product7");
//! ```
//!
//! Against the real service, use [`Database::connect`] with
//! [`ClientOptions`].
//!
//! # Modules
//!
//! - [`model`]: Plain data types (Field, Link, Property, ItemDocument, queries)
//! - [`proxy`]: Change-tracking containers for item fields
//! - [`item`]: The item itself: lazy load, diff-based save, queries
//! - [`codec`]: XML encoding/decoding
//! - [`transport`]: Addressed-resource clients (HTTP and in-memory)
//! - [`config`]: Client options
//! - [`error`]: Error types
//! - [`limits`]: Wire constants and decoding limits
//!
//! # Threading
//!
//! Everything is blocking. An [`Item`] needs `&mut self` to change, so it is
//! owned by one task at a time; wrap it in a `Mutex` to share it.
//! [`Database`] is cheap to clone and `Send + Sync`.

pub mod codec;
pub mod config;
pub mod database;
pub mod error;
pub mod item;
pub mod limits;
pub mod model;
pub mod proxy;
pub mod transport;

// Re-export commonly used types at crate root
pub use codec::{generate, parse_item, parse_list};
pub use config::ClientOptions;
pub use database::Database;
pub use error::{DecodeError, EncodeError, Error, FieldError, Result, TransportError};
pub use item::{Item, Snapshot};
pub use model::{
    Field, ItemDocument, Link, LinkKey, LinkOptions, LinkRef, Property, QueryKind, QueryOptions,
    RankedItem,
};
pub use proxy::{ContainerProxy, Entry, LinkProxy};
pub use transport::{HttpTransport, MemoryTransport, ResourcePath, Transport};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
