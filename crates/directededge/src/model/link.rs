//! Links: typed, optionally weighted edges to other items.

use std::borrow::Cow;

use crate::item::Item;

/// Edge metadata. Opaque to the client: nothing here is validated locally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LinkOptions {
    /// Edge weight; the server defines the accepted range.
    pub weight: Option<u32>,
    /// Link type; `None` is the server's default type.
    pub link_type: Option<String>,
}

impl LinkOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weight(mut self, weight: u32) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn link_type(mut self, link_type: impl Into<String>) -> Self {
        self.link_type = Some(link_type.into());
        self
    }
}

/// A directed edge from the owning item to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    pub target: String,
    pub options: LinkOptions,
}

impl Link {
    /// Creates an untyped, unweighted link.
    pub fn new(target: impl Into<String>) -> Self {
        Self::with_options(target, LinkOptions::default())
    }

    pub fn with_options(target: impl Into<String>, options: LinkOptions) -> Self {
        Self {
            target: target.into(),
            options,
        }
    }

    /// Identity of the link: target plus type. Two links differing only in
    /// weight are the same edge.
    pub fn key(&self) -> LinkKey {
        LinkKey {
            target: self.target.clone(),
            link_type: self.options.link_type.clone(),
        }
    }
}

/// Identity of a [`Link`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkKey {
    pub target: String,
    pub link_type: Option<String>,
}

impl From<&str> for LinkKey {
    fn from(target: &str) -> Self {
        Self {
            target: target.to_string(),
            link_type: None,
        }
    }
}

impl From<String> for LinkKey {
    fn from(target: String) -> Self {
        Self {
            target,
            link_type: None,
        }
    }
}

/// Anything a link can be made from.
#[derive(Debug, Clone)]
pub enum LinkRef<'a> {
    /// A bare item identifier.
    Id(Cow<'a, str>),
    /// Another item; the link points at its identifier.
    Item(&'a Item),
    /// A prebuilt link, used as is.
    Link(Link),
}

impl LinkRef<'_> {
    /// Normalizes into a [`Link`]. `options` apply to identifiers and items;
    /// a prebuilt link keeps its own options.
    pub fn into_link(self, options: LinkOptions) -> Link {
        match self {
            LinkRef::Id(id) => Link::with_options(id.into_owned(), options),
            LinkRef::Item(item) => Link::with_options(item.id(), options),
            LinkRef::Link(link) => link,
        }
    }
}

impl<'a> From<&'a str> for LinkRef<'a> {
    fn from(id: &'a str) -> Self {
        LinkRef::Id(Cow::Borrowed(id))
    }
}

impl From<String> for LinkRef<'_> {
    fn from(id: String) -> Self {
        LinkRef::Id(Cow::Owned(id))
    }
}

impl<'a> From<&'a String> for LinkRef<'a> {
    fn from(id: &'a String) -> Self {
        LinkRef::Id(Cow::Borrowed(id.as_str()))
    }
}

impl<'a> From<&'a Item> for LinkRef<'a> {
    fn from(item: &'a Item) -> Self {
        LinkRef::Item(item)
    }
}

impl From<Link> for LinkRef<'_> {
    fn from(link: Link) -> Self {
        LinkRef::Link(link)
    }
}
