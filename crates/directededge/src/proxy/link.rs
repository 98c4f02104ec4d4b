//! Container proxy for the `links` field.

use std::ops::Deref;

use crate::model::{Link, LinkOptions, LinkRef};
use crate::proxy::ContainerProxy;

/// A [`ContainerProxy`] of links that accepts identifiers, items or
/// prebuilt links and normalizes them before queuing.
#[derive(Debug, Clone, Default)]
pub struct LinkProxy {
    inner: ContainerProxy<Link>,
}

impl LinkProxy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Links to `target` with default options.
    pub fn add<'a>(&mut self, target: impl Into<LinkRef<'a>>) {
        self.add_with(target, LinkOptions::default());
    }

    /// Links to `target` with the given weight/type.
    pub fn add_with<'a>(&mut self, target: impl Into<LinkRef<'a>>, options: LinkOptions) {
        self.inner.add(target.into().into_link(options));
    }

    /// Removes the untyped link to `target`, or the link itself when given a
    /// prebuilt [`Link`].
    pub fn remove<'a>(&mut self, target: impl Into<LinkRef<'a>>) {
        self.remove_with(target, LinkOptions::default());
    }

    /// Removes the link to `target` whose type matches `options.link_type`.
    pub fn remove_with<'a>(&mut self, target: impl Into<LinkRef<'a>>, options: LinkOptions) {
        self.inner.remove(target.into().into_link(options).key());
    }

    pub(crate) fn inner_mut(&mut self) -> &mut ContainerProxy<Link> {
        &mut self.inner
    }
}

impl Deref for LinkProxy {
    type Target = ContainerProxy<Link>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LinkKey;

    #[test]
    fn test_identifier_becomes_link() {
        let mut links = LinkProxy::new();
        links.add("user2");
        assert_eq!(links.add_queue(), &[Link::new("user2")]);
    }

    #[test]
    fn test_options_are_attached() {
        let mut links = LinkProxy::new();
        links.add_with("user2", LinkOptions::new().weight(5).link_type("friend"));

        let link = links
            .get(LinkKey {
                target: "user2".into(),
                link_type: Some("friend".into()),
            })
            .unwrap();
        assert_eq!(link.options.weight, Some(5));
    }

    #[test]
    fn test_reweighting_overwrites() {
        let mut links = LinkProxy::new();
        links.add_with("user2", LinkOptions::new().weight(1));
        links.add_with("user2", LinkOptions::new().weight(8));

        assert_eq!(links.len(), 1);
        assert_eq!(links.add_queue()[0].options.weight, Some(8));
    }

    #[test]
    fn test_add_remove_cancels() {
        let mut links = LinkProxy::new();
        links.add("user2");
        links.remove("user2");
        assert!(!links.has_pending());
    }

    #[test]
    fn test_typed_removal_is_distinct() {
        let mut links = LinkProxy::new();
        links.add_with("user2", LinkOptions::new().link_type("friend"));
        links.remove("user2");

        // The untyped edge is a different link, so the typed add survives.
        assert_eq!(links.add_queue().len(), 1);
        assert_eq!(links.remove_queue(), &[Link::new("user2")]);
    }
}
