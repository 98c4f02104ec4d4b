//! The fixed set of item fields.

use std::fmt;
use std::str::FromStr;

use crate::error::FieldError;

/// One of the five collections every item carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Links,
    Tags,
    Properties,
    Preselected,
    Blacklisted,
}

impl Field {
    /// All fields in wire order.
    pub const ALL: [Field; 5] = [
        Field::Links,
        Field::Tags,
        Field::Properties,
        Field::Preselected,
        Field::Blacklisted,
    ];

    /// Field name as used by callers (`links`, `tags`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Field::Links => "links",
            Field::Tags => "tags",
            Field::Properties => "properties",
            Field::Preselected => "preselected",
            Field::Blacklisted => "blacklisted",
        }
    }

    /// Element name of a single entry in the XML document.
    pub fn element(self) -> &'static str {
        match self {
            Field::Links => "link",
            Field::Tags => "tag",
            Field::Properties => "property",
            Field::Preselected => "preselected",
            Field::Blacklisted => "blacklisted",
        }
    }

    /// Resolves an entry element name back to its field.
    pub fn from_element(element: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.element() == element)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| FieldError::Unknown { name: s.to_string() })
    }
}
