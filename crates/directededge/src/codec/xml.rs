//! XML encoding/decoding of item documents.
//!
//! The server speaks a small fixed dialect:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <directededge version="0.1">
//!   <item id="user1">
//!     <link weight="3" type="friend">user2</link>
//!     <tag>sports</tag>
//!     <property name="city">Berlin</property>
//!     <preselected>item9</preselected>
//!     <blacklisted>item7</blacklisted>
//!   </item>
//! </directededge>
//! ```
//!
//! Relationship queries answer with the same envelope, one `<related>` or
//! `<recommended>` child per result.

use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use tracing::trace;

use crate::error::{DecodeError, EncodeError};
use crate::limits::{ITEM_ELEMENT, MAX_DOCUMENT_SIZE, ROOT_ELEMENT, XML_VERSION};
use crate::model::{Field, ItemDocument, Link, LinkOptions, Property, QueryKind, RankedItem};

// =============================================================================
// DECODING
// =============================================================================

/// A direct child of `<item>`, fully read.
#[derive(Debug, Default)]
struct Child {
    element: String,
    attributes: Vec<(String, String)>,
    text: String,
}

impl Child {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

fn malformed(reader: &Reader<&[u8]>, err: impl std::fmt::Display) -> DecodeError {
    DecodeError::Malformed {
        position: reader.buffer_position() as u64,
        message: err.to_string(),
    }
}

fn element_name(reader: &Reader<&[u8]>, start: &BytesStart<'_>) -> Result<String, DecodeError> {
    std::str::from_utf8(start.name().as_ref())
        .map(str::to_string)
        .map_err(|e| malformed(reader, e))
}

fn read_attributes(
    reader: &Reader<&[u8]>,
    start: &BytesStart<'_>,
) -> Result<Vec<(String, String)>, DecodeError> {
    let mut out = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| malformed(reader, e))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| malformed(reader, e))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| malformed(reader, e))?
            .into_owned();
        out.push((key, value));
    }
    Ok(out)
}

/// Walks the `<directededge><item>` envelope, handing every child of the
/// item to `on_child`. Returns the item id.
fn read_item<F>(body: &str, mut on_child: F) -> Result<String, DecodeError>
where
    F: FnMut(Child) -> Result<(), DecodeError>,
{
    if body.len() > MAX_DOCUMENT_SIZE {
        return Err(DecodeError::DocumentTooLarge {
            len: body.len(),
            max: MAX_DOCUMENT_SIZE,
        });
    }

    let mut reader = Reader::from_str(body);

    let mut depth = 0usize;
    let mut seen_root = false;
    let mut in_item = false;
    let mut item_id: Option<String> = None;
    let mut current: Option<Child> = None;

    loop {
        let event = reader.read_event().map_err(|e| malformed(&reader, e))?;
        match event {
            Event::Start(ref start) | Event::Empty(ref start) => {
                let is_empty = matches!(event, Event::Empty(_));
                let name = element_name(&reader, start)?;

                match depth {
                    0 => {
                        if seen_root {
                            return Err(DecodeError::MultipleRoots);
                        }
                        if name != ROOT_ELEMENT {
                            return Err(DecodeError::UnexpectedRoot {
                                expected: ROOT_ELEMENT,
                                found: name,
                            });
                        }
                        seen_root = true;
                    }
                    1 if name == ITEM_ELEMENT => {
                        if item_id.is_some() {
                            return Err(DecodeError::MultipleItems);
                        }
                        let id = read_attributes(&reader, start)?
                            .into_iter()
                            .find(|(k, _)| k == "id")
                            .map(|(_, v)| v)
                            .ok_or(DecodeError::MissingAttribute {
                                element: ITEM_ELEMENT,
                                attribute: "id",
                            })?;
                        item_id = Some(id);
                        in_item = !is_empty;
                    }
                    2 if in_item => {
                        let child = Child {
                            attributes: read_attributes(&reader, start)?,
                            element: name,
                            text: String::new(),
                        };
                        if is_empty {
                            on_child(child)?;
                        } else {
                            current = Some(child);
                        }
                    }
                    _ => trace!(element = %name, depth, "skipping element"),
                }

                if !is_empty {
                    depth += 1;
                }
            }
            Event::Text(text) => {
                if let Some(child) = current.as_mut() {
                    if depth == 3 {
                        let text = text.unescape().map_err(|e| malformed(&reader, e))?;
                        child.text.push_str(&text);
                    }
                }
            }
            Event::CData(data) => {
                if let Some(child) = current.as_mut() {
                    if depth == 3 {
                        child.text.push_str(&String::from_utf8_lossy(&data));
                    }
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                match depth {
                    2 => {
                        if let Some(child) = current.take() {
                            on_child(child)?;
                        }
                    }
                    1 => in_item = false,
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(malformed(&reader, "unexpected end of document"));
    }
    if !seen_root {
        return Err(DecodeError::MissingElement {
            element: ROOT_ELEMENT,
        });
    }
    item_id.ok_or(DecodeError::MissingElement {
        element: ITEM_ELEMENT,
    })
}

fn parse_link(child: Child) -> Result<Link, DecodeError> {
    let weight = match child.attribute("weight") {
        Some(raw) => Some(raw.parse::<u32>().map_err(|_| DecodeError::InvalidAttribute {
            element: child.element.clone(),
            attribute: "weight",
            value: raw.to_string(),
        })?),
        None => None,
    };
    let link_type = child.attribute("type").map(str::to_string);

    Ok(Link {
        target: child.text,
        options: LinkOptions { weight, link_type },
    })
}

/// Parses a full item document.
pub fn parse_item(body: &str) -> Result<ItemDocument, DecodeError> {
    let mut doc = ItemDocument::default();

    let id = read_item(body, |child| {
        match Field::from_element(&child.element) {
            Some(Field::Links) => doc.links.push(parse_link(child)?),
            Some(Field::Tags) => doc.tags.push(child.text),
            Some(Field::Properties) => {
                let name = child
                    .attribute("name")
                    .ok_or(DecodeError::MissingAttribute {
                        element: "property",
                        attribute: "name",
                    })?
                    .to_string();
                doc.properties.push(Property::new(name, child.text));
            }
            Some(Field::Preselected) => doc.preselected.push(child.text),
            Some(Field::Blacklisted) => doc.blacklisted.push(child.text),
            None => trace!(element = %child.element, "ignoring unknown item child"),
        }
        Ok(())
    })?;
    doc.id = id;

    Ok(doc)
}

/// Parses the response of a `related` or `recommended` query.
pub fn parse_list(kind: QueryKind, body: &str) -> Result<Vec<RankedItem>, DecodeError> {
    let element = kind.path_segment();
    let mut items = Vec::new();

    read_item(body, |child| {
        if child.element != element {
            trace!(element = %child.element, "ignoring non-result child");
            return Ok(());
        }
        let weight = match child.attribute("weight") {
            Some(raw) => Some(raw.parse::<f64>().map_err(|_| DecodeError::InvalidAttribute {
                element: child.element.clone(),
                attribute: "weight",
                value: raw.to_string(),
            })?),
            None => None,
        };
        items.push(RankedItem {
            id: child.text,
            weight,
        });
        Ok(())
    })?;

    Ok(items)
}

// =============================================================================
// ENCODING
// =============================================================================

fn write_error(err: impl std::fmt::Display) -> EncodeError {
    EncodeError::Write(err.to_string())
}

/// Writes `<start>text</start>`, or `<start/>` when `text` is empty.
fn write_entry(w: &mut Writer<Vec<u8>>, start: BytesStart<'_>, text: &str) -> Result<(), EncodeError> {
    if text.is_empty() {
        return w.write_event(Event::Empty(start)).map_err(write_error);
    }
    w.write_event(Event::Start(start.borrow())).map_err(write_error)?;
    w.write_event(Event::Text(BytesText::new(text)))
        .map_err(write_error)?;
    w.write_event(Event::End(start.to_end())).map_err(write_error)
}

/// Serializes an item document. `with_header` prepends the XML declaration.
pub fn generate(doc: &ItemDocument, with_header: bool) -> Result<String, EncodeError> {
    let mut w = Writer::new(Vec::new());

    if with_header {
        w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(write_error)?;
    }

    let mut root = BytesStart::new(ROOT_ELEMENT);
    root.push_attribute(("version", XML_VERSION));
    w.write_event(Event::Start(root.borrow())).map_err(write_error)?;

    let mut item = BytesStart::new(ITEM_ELEMENT);
    item.push_attribute(("id", doc.id.as_str()));
    w.write_event(Event::Start(item.borrow())).map_err(write_error)?;

    for link in &doc.links {
        let mut start = BytesStart::new(Field::Links.element());
        if let Some(weight) = link.options.weight {
            start.push_attribute(("weight", weight.to_string().as_str()));
        }
        if let Some(link_type) = &link.options.link_type {
            start.push_attribute(("type", link_type.as_str()));
        }
        write_entry(&mut w, start, &link.target)?;
    }
    for tag in &doc.tags {
        write_entry(&mut w, BytesStart::new(Field::Tags.element()), tag)?;
    }
    for property in &doc.properties {
        let mut start = BytesStart::new(Field::Properties.element());
        start.push_attribute(("name", property.name.as_str()));
        write_entry(&mut w, start, &property.value)?;
    }
    for id in &doc.preselected {
        write_entry(&mut w, BytesStart::new(Field::Preselected.element()), id)?;
    }
    for id in &doc.blacklisted {
        write_entry(&mut w, BytesStart::new(Field::Blacklisted.element()), id)?;
    }

    w.write_event(Event::End(item.to_end())).map_err(write_error)?;
    w.write_event(Event::End(root.to_end())).map_err(write_error)?;

    String::from_utf8(w.into_inner()).map_err(|_| EncodeError::InvalidUtf8)
}
