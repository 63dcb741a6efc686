//! Owned element tree built from quick-xml events.
//!
//! Tags and attribute keys are stored by local name so that documents with and
//! without namespace prefixes are matched the same way. Namespace declarations
//! are collected separately and never appear as attributes.

use std::collections::BTreeMap;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::error::{Result, XrioError};

/// Key under which the unprefixed namespace is recorded.
pub const DEFAULT_NAMESPACE_KEY: &str = "default";

/// Deepest element nesting accepted by [`XmlDocument::parse`].
pub const MAX_DEPTH: usize = 256;

/// One XML element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    /// Local name of the element.
    pub tag: String,
    /// Attributes in document order, keyed by local name.
    pub attributes: Vec<(String, String)>,
    /// Trimmed text that precedes the first child element.
    pub text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Value of the attribute with this exact local name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First direct child with this exact local name.
    pub fn child(&self, tag: &str) -> Option<&XmlNode> {
        self.children.iter().find(|child| child.tag == tag)
    }

    /// Text of the first direct child with this tag, if non-empty.
    pub fn child_text(&self, tag: &str) -> Option<&str> {
        self.child(tag)
            .map(|child| child.text.as_str())
            .filter(|text| !text.is_empty())
    }

    /// This node and all of its descendants in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Indented XML for this element and its subtree.
    pub fn to_pretty_xml(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        write_tree(&mut writer, self)?;
        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }
}

/// Pre-order iterator over a subtree.
pub struct Descendants<'a> {
    stack: Vec<&'a XmlNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// A parsed document: its root element and every namespace it declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    pub root: XmlNode,
    /// Prefix to URI. The first declaration of a prefix wins.
    pub namespaces: BTreeMap<String, String>,
}

struct OpenElement {
    node: XmlNode,
    has_children: bool,
}

impl XmlDocument {
    /// Parses a complete document; any syntax error fails the whole parse, as
    /// does nesting deeper than [`MAX_DEPTH`].
    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = Reader::from_str(text.trim_start_matches('\u{feff}'));
        let mut stack: Vec<OpenElement> = Vec::new();
        let mut root: Option<XmlNode> = None;
        let mut namespaces = BTreeMap::new();

        loop {
            let event = reader.read_event().map_err(|e| {
                XrioError::malformed(format!("{e} at byte {}", reader.buffer_position()))
            })?;
            match event {
                Event::Start(start) => {
                    check_depth(stack.len() + 1)?;
                    let node = open_element(&start, &mut namespaces)?;
                    stack.push(OpenElement {
                        node,
                        has_children: false,
                    });
                }
                Event::Empty(start) => {
                    check_depth(stack.len() + 1)?;
                    let node = open_element(&start, &mut namespaces)?;
                    attach(&mut stack, &mut root, node)?;
                }
                Event::End(_) => {
                    let Some(open) = stack.pop() else {
                        return Err(XrioError::malformed("unexpected closing tag"));
                    };
                    let mut node = open.node;
                    node.text = node.text.trim().to_string();
                    attach(&mut stack, &mut root, node)?;
                }
                Event::Text(text) => {
                    let raw = String::from_utf8_lossy(&text);
                    let decoded = unescape(&raw).map_or_else(|_| raw.to_string(), |t| t.into_owned());
                    append_text(&mut stack, &decoded);
                }
                Event::CData(data) => append_text(&mut stack, &String::from_utf8_lossy(&data)),
                Event::GeneralRef(reference) => {
                    let name = String::from_utf8_lossy(&reference);
                    append_text(&mut stack, &resolve_reference(&name));
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(XrioError::malformed(format!(
                "unclosed element <{}>",
                open.node.tag
            )));
        }
        let root = root.ok_or_else(|| XrioError::malformed("document has no root element"))?;
        Ok(Self { root, namespaces })
    }
}

fn check_depth(depth: usize) -> Result<()> {
    if depth > MAX_DEPTH {
        return Err(XrioError::malformed(format!(
            "elements nested deeper than {MAX_DEPTH} levels"
        )));
    }
    Ok(())
}

fn open_element(
    start: &BytesStart<'_>,
    namespaces: &mut BTreeMap<String, String>,
) -> Result<XmlNode> {
    let mut node = XmlNode::new(String::from_utf8_lossy(start.local_name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| XrioError::malformed(e.to_string()))?;
        let raw = String::from_utf8_lossy(&attribute.value);
        let value = unescape(&raw).map_or_else(|_| raw.to_string(), |v| v.into_owned());

        let key = attribute.key.as_ref();
        if key == b"xmlns" {
            namespaces
                .entry(DEFAULT_NAMESPACE_KEY.to_string())
                .or_insert(value);
        } else if let Some(prefix) = key.strip_prefix(b"xmlns:") {
            namespaces
                .entry(String::from_utf8_lossy(prefix).into_owned())
                .or_insert(value);
        } else {
            let local = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
            node.attributes.push((local, value));
        }
    }
    Ok(node)
}

fn attach(stack: &mut [OpenElement], root: &mut Option<XmlNode>, node: XmlNode) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.has_children = true;
        parent.node.children.push(node);
        return Ok(());
    }
    if root.is_some() {
        return Err(XrioError::malformed(format!(
            "second root element <{}>",
            node.tag
        )));
    }
    *root = Some(node);
    Ok(())
}

fn append_text(stack: &mut [OpenElement], text: &str) {
    if let Some(open) = stack.last_mut()
        && !open.has_children
    {
        open.node.text.push_str(text);
    }
}

/// Resolves `&name;` given the bare name. Unknown entities are kept literally.
fn resolve_reference(name: &str) -> String {
    if let Some(code) = name.strip_prefix('#') {
        let parsed = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse().ok(),
        };
        if let Some(ch) = parsed.and_then(char::from_u32) {
            return ch.to_string();
        }
    } else if let Some(resolved) = resolve_predefined_entity(name) {
        return resolved.to_string();
    }
    format!("&{name};")
}

enum WriteStep<'n> {
    Open(&'n XmlNode),
    Close(&'n XmlNode),
}

fn write_tree(writer: &mut Writer<Vec<u8>>, root: &XmlNode) -> Result<()> {
    let mut pending = vec![WriteStep::Open(root)];
    while let Some(step) = pending.pop() {
        let node = match step {
            WriteStep::Open(node) => node,
            WriteStep::Close(node) => {
                emit(writer, node, Event::End(BytesEnd::new(node.tag.as_str())))?;
                continue;
            }
        };
        let mut start = BytesStart::new(node.tag.as_str());
        for (key, value) in &node.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }
        if node.text.is_empty() && node.children.is_empty() {
            emit(writer, node, Event::Empty(start))?;
            continue;
        }
        emit(writer, node, Event::Start(start))?;
        if !node.text.is_empty() {
            emit(writer, node, Event::Text(BytesText::new(&node.text)))?;
        }
        pending.push(WriteStep::Close(node));
        pending.extend(node.children.iter().rev().map(WriteStep::Open));
    }
    Ok(())
}

fn emit(writer: &mut Writer<Vec<u8>>, node: &XmlNode, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| XrioError::Render {
            tag: node.tag.clone(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_prefixes_and_collects_namespaces() {
        let doc = XmlDocument::parse(
            r#"<x:Root xmlns="urn:a" xmlns:x="urn:x" x:type="REL670"><x:Item>1</x:Item></x:Root>"#,
        )
        .expect("parse");
        assert_eq!(doc.root.tag, "Root");
        assert_eq!(doc.root.attr("type"), Some("REL670"));
        assert_eq!(doc.root.child_text("Item"), Some("1"));
        assert_eq!(doc.namespaces.get("default").map(String::as_str), Some("urn:a"));
        assert_eq!(doc.namespaces.get("x").map(String::as_str), Some("urn:x"));
        assert_eq!(doc.root.attributes.len(), 1);
    }

    #[test]
    fn text_keeps_entities_and_ignores_tails() {
        let doc = XmlDocument::parse("<a> R &amp; D &#65; <b/>tail</a>").expect("parse");
        assert_eq!(doc.root.text, "R & D A");
        assert_eq!(doc.root.children.len(), 1);
    }

    #[test]
    fn rejects_unclosed_and_double_roots() {
        assert!(XmlDocument::parse("<a><b></b>").is_err());
        assert!(XmlDocument::parse("<a/><b/>").is_err());
        assert!(XmlDocument::parse("").is_err());
        assert!(XmlDocument::parse("<a></b>").is_err());
    }

    fn nested(depth: usize) -> String {
        format!("{}{}", "<n>".repeat(depth), "</n>".repeat(depth))
    }

    #[test]
    fn nesting_is_limited() {
        let doc = XmlDocument::parse(&nested(MAX_DEPTH)).expect("parse at limit");
        assert_eq!(doc.root.descendants().count(), MAX_DEPTH);
        let xml = doc.root.to_pretty_xml().expect("render");
        assert_eq!(XmlDocument::parse(&xml).expect("reparse").root, doc.root);

        let error = XmlDocument::parse(&nested(MAX_DEPTH + 1)).unwrap_err();
        assert!(matches!(error, XrioError::Malformed { .. }));
        assert!(XmlDocument::parse(&format!("<a>{}</a>", "<b/>".repeat(3))).is_ok());
        let empty_leaf = format!("{}<e/>{}", "<n>".repeat(MAX_DEPTH), "</n>".repeat(MAX_DEPTH));
        assert!(XmlDocument::parse(&empty_leaf).is_err());
    }

    #[test]
    fn descendants_are_preorder() {
        let doc = XmlDocument::parse("<a><b><c/></b><d/></a>").expect("parse");
        let tags: Vec<_> = doc.root.descendants().map(|n| n.tag.as_str()).collect();
        assert_eq!(tags, ["a", "b", "c", "d"]);
    }

    #[test]
    fn pretty_print_round_trips_structure() {
        let doc = XmlDocument::parse(r#"<Block Id="X"><Name>A1RADR</Name><Empty/></Block>"#)
            .expect("parse");
        let xml = doc.root.to_pretty_xml().expect("render");
        let again = XmlDocument::parse(&xml).expect("reparse");
        assert_eq!(again.root, doc.root);
        assert!(xml.contains("<Name>A1RADR</Name>"));
    }
}
