//! Wire encoding/decoding for Directed Edge items.
//!
//! This module implements the XML dialect spoken by the REST API.

pub mod xml;

pub use xml::{generate, parse_item, parse_list};
