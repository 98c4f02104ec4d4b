//! A single item of a remote database.
//!
//! An [`Item`] starts out empty and unfetched. Mutations go straight into
//! its container proxies without touching the network; the first read of a
//! field fetches the whole item once. [`Item::save`] then sends what is
//! known:
//!
//! 1. the full snapshot, if the item was fetched (PUT);
//! 2. the pending additions of every field (POST `update_method=add`);
//! 3. the pending removals of every field (POST `update_method=subtract`).
//!
//! Afterwards every proxy is cleared, so the next read fetches again rather
//! than trusting local state the server may have transformed.
//!
//! # Example
//!
//! ```rust
//! use directededge::{Database, MemoryTransport};
//!
//! let transport = MemoryTransport::new();
//! let db = Database::new("testdb", transport.clone());
//!
//! let mut item = db.item("user1");
//! item.tags_mut().add("sports");
//! item.links_mut().add("user2");
//! item.save().unwrap();
//!
//! // Nothing was fetched, so only the incremental add was written.
//! assert_eq!(transport.writes().len(), 1);
//! ```

use std::collections::hash_map::Entry as MapEntry;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::codec;
use crate::database::Database;
use crate::error::Result;
use crate::limits::UPDATE_METHOD_PARAM;
use crate::model::{Field, ItemDocument, Property, QueryKind, QueryOptions, RankedItem};
use crate::proxy::{ContainerProxy, Entry, LinkProxy};
use crate::transport::ResourcePath;

/// Which view of an item to serialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Snapshot {
    /// Everything loaded from the server, with local changes merged in.
    Cached,
    /// Pending additions only.
    Added,
    /// Pending removals only.
    Removed,
}

impl Snapshot {
    fn pick<E: Entry>(self, proxy: &ContainerProxy<E>) -> Vec<E> {
        match self {
            Snapshot::Cached => proxy.cached().map(<[E]>::to_vec).unwrap_or_default(),
            Snapshot::Added => proxy.add_queue().to_vec(),
            Snapshot::Removed => proxy.remove_queue().to_vec(),
        }
    }
}

/// A node of the recommendation graph, identified by a string id.
#[derive(Debug)]
pub struct Item {
    database: Database,
    id: String,
    links: LinkProxy,
    tags: ContainerProxy<String>,
    properties: ContainerProxy<Property>,
    preselected: ContainerProxy<String>,
    blacklisted: ContainerProxy<String>,
    query_cache: FxHashMap<(QueryKind, QueryOptions), Vec<RankedItem>>,
}

impl Item {
    /// Creates a handle on item `id` of `database`. No request is made.
    pub fn new(database: &Database, id: impl ToString) -> Self {
        Self {
            database: database.clone(),
            id: id.to_string(),
            links: LinkProxy::new(),
            tags: ContainerProxy::new(),
            properties: ContainerProxy::new(),
            preselected: ContainerProxy::new(),
            blacklisted: ContainerProxy::new(),
            query_cache: FxHashMap::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    fn resource(&self) -> ResourcePath {
        self.database.item_path(&self.id)
    }

    fn fetch(&self) -> Result<ItemDocument> {
        let path = self.resource();
        debug!(item = %self.id, %path, "fetching item");
        let body = self.database.transport().get(&path)?;
        Ok(codec::parse_item(&body)?)
    }

    fn fill(&mut self, doc: ItemDocument) {
        self.links.inner_mut().set(doc.links);
        self.tags.set(doc.tags);
        self.properties.set(doc.properties);
        self.preselected.set(doc.preselected);
        self.blacklisted.set(doc.blacklisted);
    }

    /// Fetches the item and replaces every field with the server's value,
    /// discarding pending changes.
    ///
    /// The document is parsed completely before any field is touched, so a
    /// failed load leaves the item as it was.
    pub fn load(&mut self) -> Result<&mut Self> {
        let doc = self.fetch()?;
        self.links.inner_mut().clear_queues();
        self.tags.clear_queues();
        self.properties.clear_queues();
        self.preselected.clear_queues();
        self.blacklisted.clear_queues();
        self.fill(doc);
        Ok(self)
    }

    /// Fetches on first read, keeping pending changes on top.
    fn ensure_loaded(&mut self) -> Result<()> {
        if !self.is_cached() {
            let doc = self.fetch()?;
            self.fill(doc);
        }
        Ok(())
    }

    /// Returns true once the item has been fetched. Loading is
    /// all-or-nothing, so this holds for every field or for none.
    pub fn is_cached(&self) -> bool {
        self.links.is_cached()
            || self.tags.is_cached()
            || self.properties.is_cached()
            || self.preselected.is_cached()
            || self.blacklisted.is_cached()
    }

    /// Pending `(additions, removals)` of `field`.
    pub fn pending(&self, field: Field) -> (usize, usize) {
        fn counts<E: Entry>(proxy: &ContainerProxy<E>) -> (usize, usize) {
            (proxy.add_queue().len(), proxy.remove_queue().len())
        }
        match field {
            Field::Links => counts(&*self.links),
            Field::Tags => counts(&self.tags),
            Field::Properties => counts(&self.properties),
            Field::Preselected => counts(&self.preselected),
            Field::Blacklisted => counts(&self.blacklisted),
        }
    }

    /// Like [`pending`](Self::pending), with the field given by its name
    /// (`"links"`, `"tags"`, ...).
    pub fn pending_by_name(&self, name: &str) -> Result<(usize, usize)> {
        Ok(self.pending(name.parse::<Field>()?))
    }

    /// Returns true if any field has an unsaved change.
    pub fn has_pending(&self) -> bool {
        Field::ALL.into_iter().any(|f| self.pending(f) != (0, 0))
    }

    // =========================================================================
    // Field access
    // =========================================================================

    pub fn links(&mut self) -> Result<&LinkProxy> {
        self.ensure_loaded()?;
        Ok(&self.links)
    }

    pub fn tags(&mut self) -> Result<&ContainerProxy<String>> {
        self.ensure_loaded()?;
        Ok(&self.tags)
    }

    pub fn properties(&mut self) -> Result<&ContainerProxy<Property>> {
        self.ensure_loaded()?;
        Ok(&self.properties)
    }

    pub fn preselected(&mut self) -> Result<&ContainerProxy<String>> {
        self.ensure_loaded()?;
        Ok(&self.preselected)
    }

    pub fn blacklisted(&mut self) -> Result<&ContainerProxy<String>> {
        self.ensure_loaded()?;
        Ok(&self.blacklisted)
    }

    pub fn links_mut(&mut self) -> &mut LinkProxy {
        &mut self.links
    }

    pub fn tags_mut(&mut self) -> &mut ContainerProxy<String> {
        &mut self.tags
    }

    pub fn properties_mut(&mut self) -> &mut ContainerProxy<Property> {
        &mut self.properties
    }

    pub fn preselected_mut(&mut self) -> &mut ContainerProxy<String> {
        &mut self.preselected
    }

    pub fn blacklisted_mut(&mut self) -> &mut ContainerProxy<String> {
        &mut self.blacklisted
    }

    /// Reads a property, fetching the item first if needed.
    pub fn property(&mut self, name: &str) -> Result<Option<&str>> {
        self.ensure_loaded()?;
        Ok(self.properties.get(name).map(|p| p.value.as_str()))
    }

    /// Sets a property, overwriting any earlier value. No request is made.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.add(Property::new(name, value));
    }

    /// Removes a property. No request is made.
    pub fn remove_property(&mut self, name: impl Into<String>) {
        self.properties.remove(name);
    }

    // =========================================================================
    // Saving
    // =========================================================================

    /// Builds the document for one view of the item.
    pub fn snapshot(&self, which: Snapshot) -> ItemDocument {
        ItemDocument {
            id: self.id.clone(),
            links: which.pick(&*self.links),
            tags: which.pick(&self.tags),
            properties: which.pick(&self.properties),
            preselected: which.pick(&self.preselected),
            blacklisted: which.pick(&self.blacklisted),
        }
    }

    /// Serializes one view of the item.
    pub fn to_xml(&self, which: Snapshot, with_header: bool) -> Result<String> {
        Ok(codec::generate(&self.snapshot(which), with_header)?)
    }

    fn has_queued(&self, which: Snapshot) -> bool {
        Field::ALL.into_iter().any(|f| {
            let (added, removed) = self.pending(f);
            match which {
                Snapshot::Added => added > 0,
                Snapshot::Removed => removed > 0,
                Snapshot::Cached => false,
            }
        })
    }

    /// Writes local state to the server, then clears every field.
    ///
    /// On error nothing is cleared, so the call can be retried.
    pub fn save(&mut self) -> Result<()> {
        let path = self.resource();
        let transport = self.database.transport();

        if self.is_cached() {
            debug!(item = %self.id, "writing full snapshot");
            transport.put(&path, self.to_xml(Snapshot::Cached, true)?)?;
        }
        if self.has_queued(Snapshot::Added) {
            debug!(item = %self.id, "writing pending additions");
            let add = path.clone().with_query(UPDATE_METHOD_PARAM, "add");
            transport.post(&add, self.to_xml(Snapshot::Added, true)?)?;
        }
        if self.has_queued(Snapshot::Removed) {
            debug!(item = %self.id, "writing pending removals");
            let subtract = path.with_query(UPDATE_METHOD_PARAM, "subtract");
            transport.post(&subtract, self.to_xml(Snapshot::Removed, true)?)?;
        }

        self.clear();
        Ok(())
    }

    /// Drops loaded values and pending changes of every field.
    fn clear(&mut self) {
        self.links.inner_mut().clear();
        self.tags.clear();
        self.properties.clear();
        self.preselected.clear();
        self.blacklisted.clear();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Items related to this one. Results are cached per `options` for the
    /// lifetime of this handle.
    pub fn related(&mut self, options: &QueryOptions) -> Result<&[RankedItem]> {
        self.query(QueryKind::Related, options)
    }

    /// Recommendations for this item. Cached like [`Item::related`].
    pub fn recommended(&mut self, options: &QueryOptions) -> Result<&[RankedItem]> {
        self.query(QueryKind::Recommended, options)
    }

    fn query(&mut self, kind: QueryKind, options: &QueryOptions) -> Result<&[RankedItem]> {
        let path = self
            .resource()
            .child(kind.path_segment())
            .with_options(options);

        match self.query_cache.entry((kind, options.clone())) {
            MapEntry::Occupied(hit) => {
                trace!(%path, "query cache hit");
                Ok(hit.into_mut().as_slice())
            }
            MapEntry::Vacant(slot) => {
                debug!(%path, "running query");
                let body = self.database.transport().get(&path)?;
                let items = codec::parse_list(kind, &body)?;
                Ok(slot.insert(items).as_slice())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DecodeError, Error, FieldError, TransportError};
    use crate::model::{Link, LinkOptions};
    use crate::transport::{Method, MemoryTransport};

    const ITEM_PATH: &str = "testdb/items/user1";

    const USER1: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<directededge version="0.1">
  <item id="user1">
    <link weight="2">user3</link>
    <tag>customer</tag>
    <property name="city">Berlin</property>
    <blacklisted>product4</blacklisted>
  </item>
</directededge>"#;

    fn setup() -> (MemoryTransport, Item) {
        let transport = MemoryTransport::new().with_body(ITEM_PATH, USER1);
        let db = Database::new("testdb", transport.clone());
        let item = db.item("user1");
        (transport, item)
    }

    fn xml(doc: ItemDocument) -> String {
        codec::generate(&doc, true).unwrap()
    }

    #[test]
    fn test_construction_is_offline() {
        let (transport, item) = setup();
        assert_eq!(item.id(), "user1");
        assert!(!item.is_cached());
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_numeric_ids_become_strings() {
        let db = Database::new("testdb", MemoryTransport::new());
        assert_eq!(db.item(17).id(), "17");
    }

    #[test]
    fn test_load_caches_every_field() {
        let (transport, mut item) = setup();
        item.tags_mut().add("pending");

        assert_eq!(item.load().unwrap().id(), "user1");
        assert!(item.links.is_cached());
        assert!(item.tags.is_cached());
        assert!(item.properties.is_cached());
        assert!(item.preselected.is_cached());
        assert!(item.blacklisted.is_cached());
        assert!(!item.has_pending());

        assert_eq!(item.tags.to_vec(), vec!["customer"]);
        assert_eq!(item.preselected.cached(), Some(&[][..]));
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn test_first_read_fetches_once() {
        let (transport, mut item) = setup();

        assert_eq!(item.tags().unwrap().to_vec(), vec!["customer"]);
        assert_eq!(item.links().unwrap().to_vec(), vec![Link::with_options("user3", LinkOptions::new().weight(2))]);
        assert_eq!(item.blacklisted().unwrap().len(), 1);

        let gets: Vec<_> = transport
            .requests()
            .into_iter()
            .filter(|r| r.method == Method::Get)
            .collect();
        assert_eq!(gets.len(), 1);
        assert_eq!(gets[0].path, ITEM_PATH);
    }

    #[test]
    fn test_lazy_fill_keeps_pending_changes() {
        let (_, mut item) = setup();
        item.tags_mut().add("sports");
        item.blacklisted_mut().remove("product4");

        let tags = item.tags().unwrap().to_vec();
        assert_eq!(tags, vec!["customer", "sports"]);
        assert!(item.blacklisted().unwrap().is_empty());
        assert_eq!(item.pending(Field::Tags), (1, 0));
        assert_eq!(item.pending(Field::Blacklisted), (0, 1));
    }

    #[test]
    fn test_tag_add_without_load_writes_only_increment() {
        let (transport, mut item) = setup();
        item.tags_mut().add("sports");
        item.save().unwrap();

        let mut expected = ItemDocument::new("user1");
        expected.tags.push("sports".into());

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].path, "testdb/items/user1?update_method=add");
        assert_eq!(requests[0].body.as_deref(), Some(xml(expected).as_str()));
    }

    #[test]
    fn test_net_zero_link_writes_nothing() {
        let (transport, mut item) = setup();
        item.links_mut().add("user2");
        item.links_mut().remove("user2");
        item.save().unwrap();

        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_second_save_is_noop() {
        let (transport, mut item) = setup();
        item.tags_mut().add("sports");
        item.blacklisted_mut().remove("product4");
        item.save().unwrap();
        assert_eq!(transport.writes().len(), 2);

        transport.clear_requests();
        item.save().unwrap();
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_save_after_load_writes_all_three() {
        let (transport, mut item) = setup();
        item.load().unwrap();
        item.tags_mut().add("sports");
        item.links_mut().remove("user3");
        transport.clear_requests();

        let full = item.snapshot(Snapshot::Cached);
        assert_eq!(full.tags, vec!["customer", "sports"]);
        assert!(full.links.is_empty());

        item.save().unwrap();

        let writes = transport.writes();
        assert_eq!(writes.len(), 3);
        assert_eq!(writes[0].method, Method::Put);
        assert_eq!(writes[0].path, ITEM_PATH);
        assert_eq!(writes[0].body.as_deref(), Some(xml(full).as_str()));
        assert_eq!(writes[1].path, "testdb/items/user1?update_method=add");
        assert_eq!(writes[2].path, "testdb/items/user1?update_method=subtract");

        let mut removed = ItemDocument::new("user1");
        removed.links.push(Link::new("user3"));
        assert_eq!(writes[2].body.as_deref(), Some(xml(removed).as_str()));
    }

    #[test]
    fn test_load_then_save_keeps_padded_values() {
        let (transport, mut item) = setup();
        transport.set_body(
            ITEM_PATH,
            concat!(
                r#"<directededge version="0.1"><item id="user1">"#,
                "<tag> padded </tag>",
                "<property name=\"bio\">  two leading spaces\nsecond line  </property>",
                "</item></directededge>",
            ),
        );

        item.load().unwrap();
        assert_eq!(item.tags.to_vec(), vec![" padded "]);
        assert_eq!(
            item.property("bio").unwrap(),
            Some("  two leading spaces\nsecond line  ")
        );

        item.save().unwrap();
        let put = transport.writes().remove(0);
        assert_eq!(put.method, Method::Put);
        let body = put.body.unwrap();
        assert!(body.contains("<tag> padded </tag>"));
        assert!(body.contains("<property name=\"bio\">  two leading spaces\nsecond line  </property>"));
    }

    #[test]
    fn test_pending_by_name() {
        let (_, mut item) = setup();
        item.tags_mut().add("sports");
        item.blacklisted_mut().remove("product4");

        assert_eq!(item.pending_by_name("tags").unwrap(), (1, 0));
        assert_eq!(item.pending_by_name("blacklisted").unwrap(), (0, 1));

        let err = item.pending_by_name("colour").unwrap_err();
        assert_eq!(
            err,
            Error::Field(FieldError::Unknown {
                name: "colour".into()
            })
        );
    }

    #[test]
    fn test_save_forces_refetch() {
        let (transport, mut item) = setup();
        item.load().unwrap();
        item.save().unwrap();
        assert!(!item.is_cached());

        transport.clear_requests();
        item.tags().unwrap();
        assert_eq!(transport.requests()[0].method, Method::Get);
    }

    #[test]
    fn test_property_overwrite() {
        let (_, mut item) = setup();
        item.set_property("city", "Paris");
        item.set_property("city", "Rome");

        assert_eq!(item.property("city").unwrap(), Some("Rome"));
        assert_eq!(item.properties().unwrap().len(), 1);
        assert_eq!(item.pending(Field::Properties), (1, 0));
    }

    #[test]
    fn test_property_removal() {
        let (_, mut item) = setup();
        item.remove_property("city");
        assert_eq!(item.property("city").unwrap(), None);

        let removed = item.snapshot(Snapshot::Removed);
        assert_eq!(removed.properties, vec![Property::new("city", "")]);
    }

    #[test]
    fn test_link_to_item() {
        let (_, mut item) = setup();
        let other = item.database().item("user9");
        item.links_mut().add_with(&other, LinkOptions::new().weight(7));

        let added = item.snapshot(Snapshot::Added);
        assert_eq!(added.links, vec![Link::with_options("user9", LinkOptions::new().weight(7))]);
    }

    #[test]
    fn test_related_is_memoized_per_options() {
        let related = r#"<directededge version="0.1"><item id="user1"><related>a</related><related>b</related></item></directededge>"#;
        let top = r#"<directededge version="0.1"><item id="user1"><related>a</related></item></directededge>"#;
        let (transport, mut item) = setup();
        transport.set_body("testdb/items/user1/related", related);
        transport.set_body("testdb/items/user1/related?maxResults=1", top);

        let all = QueryOptions::new();
        let one = QueryOptions::new().max_results(1);

        assert_eq!(item.related(&all).unwrap().len(), 2);
        assert_eq!(item.related(&all).unwrap().len(), 2);
        assert_eq!(transport.requests().len(), 1);

        assert_eq!(item.related(&one).unwrap(), &[RankedItem::new("a")]);
        assert_eq!(transport.requests().len(), 2);

        assert_eq!(item.related(&all).unwrap().len(), 2);
        assert_eq!(item.related(&one).unwrap().len(), 1);
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn test_recommended_cached_separately_from_related() {
        let body = r#"<directededge version="0.1"><item id="user1"><recommended weight="0.5">p1</recommended></item></directededge>"#;
        let (transport, mut item) = setup();
        transport.set_body("testdb/items/user1/recommended", body);
        transport.set_body(
            "testdb/items/user1/related",
            r#"<directededge version="0.1"><item id="user1"/></directededge>"#,
        );

        let options = QueryOptions::new();
        let recs = item.recommended(&options).unwrap().to_vec();
        assert_eq!(recs[0].weight, Some(0.5));
        assert!(item.related(&options).unwrap().is_empty());
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn test_malformed_load_leaves_item_untouched() {
        let (transport, mut item) = setup();
        transport.set_body(ITEM_PATH, r#"<directededge version="0.1"><item id="user1"><link weight="x">a</link>"#);
        item.tags_mut().add("sports");

        let err = item.load().unwrap_err();
        assert!(matches!(err, Error::Decode(DecodeError::InvalidAttribute { .. })));
        assert!(!item.is_cached());
        assert_eq!(item.pending(Field::Tags), (1, 0));
    }

    #[test]
    fn test_failed_save_keeps_state() {
        let (transport, mut item) = setup();
        transport.fail_with("testdb/items/user1?update_method=add", 503);
        item.tags_mut().add("sports");

        let err = item.save().unwrap_err();
        assert!(matches!(
            err,
            Error::Transport(TransportError::Status { status: 503, .. })
        ));
        assert!(item.has_pending());
    }

    #[test]
    fn test_missing_item_propagates() {
        let db = Database::new("testdb", MemoryTransport::new());
        let mut item = db.item("ghost");
        let err = item.tags().unwrap_err();
        assert!(err.is_transport());
    }
}
