//! Serializable form of a single item.

use crate::model::{Field, Link};

/// One entry of the mapping-backed `properties` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Property {
    pub name: String,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An item as it appears on the wire.
///
/// Used for the parsed server representation as well as for the full and
/// queue-only documents written back on save.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemDocument {
    pub id: String,
    pub links: Vec<Link>,
    pub tags: Vec<String>,
    pub properties: Vec<Property>,
    pub preselected: Vec<String>,
    pub blacklisted: Vec<String>,
}

impl ItemDocument {
    /// Creates an empty document for `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Returns true if no field has any entry.
    pub fn is_empty(&self) -> bool {
        Field::ALL.into_iter().all(|f| self.len(f) == 0)
    }

    /// Number of entries in `field`.
    pub fn len(&self, field: Field) -> usize {
        match field {
            Field::Links => self.links.len(),
            Field::Tags => self.tags.len(),
            Field::Properties => self.properties.len(),
            Field::Preselected => self.preselected.len(),
            Field::Blacklisted => self.blacklisted.len(),
        }
    }

    /// Looks up a property value by name.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }
}
