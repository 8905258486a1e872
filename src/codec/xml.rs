// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialize a [`Node`] tree to the panel's flavor of XML (no prolog, no
//! attributes, no explicit root wrapper beyond what the tree already
//! contains) and parse it back.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;
use std::io::Cursor;

use super::tree::Node;
use crate::error::{Error, Result};

/// Render `node`'s children as a flat sequence of sibling elements — this
/// is the shape the panel sends on the wire, e.g. for a `Root` node the
/// output is `<Root>...</Root>`.
pub fn to_xml_bytes(node: &Node) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    write_node(&mut writer, node)?;
    Ok(writer.into_inner().into_inner())
}

fn write_node(writer: &mut Writer<Cursor<Vec<u8>>>, node: &Node) -> Result<()> {
    match node {
        Node::Children(kids) => {
            for (name, child) in kids {
                write_element(writer, name, child)?;
            }
            Ok(())
        }
        Node::Leaf(_) => Err(Error::Codec("cannot serialize a bare leaf as a document".into())),
    }
}

fn write_element(writer: &mut Writer<Cursor<Vec<u8>>>, name: &str, node: &Node) -> Result<()> {
    let write_err = |e: quick_xml::Error| Error::Codec(e.to_string());
    writer.write_event(Event::Start(BytesStart::new(name))).map_err(write_err)?;
    match node {
        Node::Leaf(text) => {
            writer.write_event(Event::Text(BytesText::new(text))).map_err(write_err)?;
        }
        Node::Children(kids) => {
            for (child_name, child) in kids {
                write_element(writer, child_name, child)?;
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new(name))).map_err(write_err)?;
    Ok(())
}

/// Parse a flat XML document back into an ordered [`Node`] tree.
pub fn from_xml_bytes(xml: &[u8]) -> Result<Node> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut stack: Vec<(String, Node)> = Vec::new();
    let mut roots = Vec::new();
    let mut buf = Vec::new();

    loop {
        let read_err = |e: quick_xml::Error| Error::Codec(e.to_string());
        match reader.read_event_into(&mut buf).map_err(read_err)? {
            Event::Start(start) => {
                let name = decode_name(&start)?;
                stack.push((name, Node::children()));
            }
            Event::Empty(start) => {
                let name = decode_name(&start)?;
                push_child(&mut stack, &mut roots, name, Node::leaf(""));
            }
            Event::Text(text) => {
                let content = text.unescape().map_err(read_err)?.into_owned();
                if let Some((_, top)) = stack.last_mut() {
                    *top = Node::leaf(content);
                }
            }
            Event::End(_) => {
                let (name, node) = stack.pop().ok_or_else(|| Error::Codec("unbalanced end tag".into()))?;
                // `<X></X>` and `<X/>` are indistinguishable on the wire and
                // both denote a null slot; normalize the no-text-event case
                // to the same empty leaf `Event::Empty` already produces, so
                // parsing is the exact inverse of building a null slot.
                let node = match node {
                    Node::Children(kids) if kids.is_empty() => Node::leaf(""),
                    other => other,
                };
                push_child(&mut stack, &mut roots, name, node);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(Error::Codec("unbalanced XML document".into()));
    }
    Ok(Node::Children(roots))
}

fn decode_name(start: &BytesStart<'_>) -> Result<String> {
    std::str::from_utf8(start.name().as_ref())
        .map(str::to_owned)
        .map_err(|e| Error::Codec(e.to_string()))
}

fn push_child(stack: &mut Vec<(String, Node)>, roots: &mut Vec<(String, Node)>, name: String, node: Node) {
    match stack.last_mut() {
        Some((_, Node::Children(kids))) => kids.push((name, node)),
        Some((_, Node::Leaf(_))) => unreachable!("parent became a leaf while parsing"),
        None => roots.push((name, node)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_nested_elements() {
        let mut inner = Node::children();
        inner.push("Id", Node::leaf("STR,3|abc"));
        inner.push("Err", Node::leaf("ERR|00"));
        let mut pair = Node::children();
        pair.push("Push", inner);
        let mut root = Node::children();
        root.push("Pair", pair);
        let mut doc = Node::children();
        doc.push("Root", root);

        let xml = to_xml_bytes(&doc).expect("serializes");
        let parsed = from_xml_bytes(&xml).expect("parses");
        assert_eq!(parsed, doc);
    }

    #[test]
    fn null_slots_round_trip_as_empty_leaves() {
        let mut doc = Node::children();
        doc.push("DevStatus", Node::leaf(""));
        doc.push("Err", Node::leaf(""));

        let xml = to_xml_bytes(&doc).expect("serializes");
        let parsed = from_xml_bytes(&xml).expect("parses");
        assert_eq!(parsed, doc);
    }

    #[test]
    fn preserves_sibling_order() {
        let mut doc = Node::children();
        doc.push("A", Node::leaf("1"));
        doc.push("B", Node::leaf("2"));
        doc.push("C", Node::leaf("3"));

        let xml = to_xml_bytes(&doc).expect("serializes");
        let text = String::from_utf8(xml).expect("utf8");
        let a_pos = text.find("<A>").expect("has A");
        let b_pos = text.find("<B>").expect("has B");
        let c_pos = text.find("<C>").expect("has C");
        assert!(a_pos < b_pos && b_pos < c_pos);
    }
}
