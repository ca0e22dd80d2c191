//! A minimal owned SVG element tree.
//!
//! Just enough document structure to flatten transforms end-to-end:
//! elements with ordered attributes and children, with text, comments
//! and other XML content carried through unchanged.

mod xml;

use std::str::FromStr;

use crate::errors::{Error, Result};

pub use crate::types::AttrMap;
pub use xml::RawXmlEvent;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// Text content, stored as escaped in the source
    Text(String),
    Comment(String),
    CData(String),
    /// Declarations, processing instructions, entity references etc.
    Other(RawXmlEvent),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    name: String,
    attrs: AttrMap,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_attrs(name: impl Into<String>, attrs: AttrMap) -> Self {
        Self {
            name: name.into(),
            attrs,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(|v| v.as_str())
    }

    pub fn set_attr(&mut self, key: &str, value: &str) {
        self.attrs.insert(key, value);
    }

    pub fn remove_attr(&mut self, key: &str) -> Option<String> {
        self.attrs.remove(key)
    }

    pub fn attrs(&self) -> &AttrMap {
        &self.attrs
    }

    pub fn attrs_mut(&mut self) -> &mut AttrMap {
        &mut self.attrs
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    pub fn push_child(&mut self, node: Node) {
        self.children.push(node);
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }

    /// Depth-first search of this element and its descendants.
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.get_attr("id") == Some(id) {
            return Some(self);
        }
        self.child_elements().find_map(|el| el.find_by_id(id))
    }

    /// Remove every descendant element with the given id.
    pub fn remove_by_id(&mut self, id: &str) {
        self.children
            .retain(|node| node.as_element().is_none_or(|el| el.get_attr("id") != Some(id)));
        for el in self.child_elements_mut() {
            el.remove_by_id(id);
        }
    }

    /// Visit this element and every descendant element, parents first.
    pub fn walk(&self, f: &mut impl FnMut(&Element)) {
        f(self);
        for el in self.child_elements() {
            el.walk(f);
        }
    }

    /// Mutable `walk`; `f` may change attributes but not the children
    /// of the element it is given.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        f(self);
        for el in self.child_elements_mut() {
            el.walk_mut(f);
        }
    }
}

/// A parsed XML document: the root element plus any surrounding
/// declarations, comments and whitespace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn root(&self) -> Option<&Element> {
        self.nodes.iter().find_map(Node::as_element)
    }

    pub fn root_mut(&mut self) -> Option<&mut Element> {
        self.nodes.iter_mut().find_map(Node::as_element_mut)
    }

    /// The root element, which must exist.
    pub fn require_root_mut(&mut self) -> Result<&mut Element> {
        self.root_mut()
            .ok_or_else(|| Error::Document("no root element".to_string()))
    }

    pub fn to_xml_string(&self) -> Result<String> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        String::from_utf8(out).map_err(Error::from_err)
    }
}

impl FromStr for Document {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_reader(&mut s.as_bytes())
    }
}
