//! Data model types for Directed Edge items.
//!
//! This module contains the plain values that flow between the item, its
//! container proxies and the XML codec:
//! - Fields (the five collections of an item)
//! - Links (typed edges to other items)
//! - Documents (the wire form of an item)
//! - Queries (relationship query options and results)

pub mod document;
pub mod field;
pub mod link;
pub mod query;

pub use document::{ItemDocument, Property};
pub use field::Field;
pub use link::{Link, LinkKey, LinkOptions, LinkRef};
pub use query::{QueryKind, QueryOptions, RankedItem};
