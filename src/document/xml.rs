use std::io::{BufRead, Write};

use super::{Document, Element, Node};
use crate::errors::{Error, Result};
use crate::types::AttrMap;

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event as XmlEvent};
use quick_xml::{Reader, Writer};

/// XML content the tree carries through without interpreting it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawXmlEvent(XmlEvent<'static>);

fn utf8(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(Error::from_err)
}

impl TryFrom<&BytesStart<'_>> for Element {
    type Error = Error;

    /// Failures here are low-level XML errors (e.g. bad attribute syntax,
    /// non-UTF8) rather than anything about SVG.
    fn try_from(e: &BytesStart) -> Result<Self> {
        let name = utf8(e.name().into_inner())?;
        let attrs = e
            .attributes()
            .map(|a| {
                let aa = a.map_err(Error::from_err)?;
                let key = utf8(aa.key.into_inner())?;
                let value = aa.unescape_value().map_err(Error::from_err)?.into_owned();
                Ok((key, value))
            })
            .collect::<Result<AttrMap>>()?;
        Ok(Element::with_attrs(name, attrs))
    }
}

impl From<&Element> for BytesStart<'static> {
    fn from(el: &Element) -> Self {
        let mut bs = BytesStart::new(el.name().to_string());
        for (k, v) in el.attrs().iter() {
            bs.push_attribute(Attribute::from((k.as_str(), v.as_str())));
        }
        bs
    }
}

/// Where a finished node goes: the innermost open element, or the top
/// level once everything is closed.
fn attach(stack: &mut [Element], top: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.push_child(node),
        None => top.push(node),
    }
}

impl Document {
    pub fn from_reader(reader: &mut dyn BufRead) -> Result<Self> {
        let mut reader = Reader::from_reader(reader);
        let mut buf = Vec::new();

        let mut top = Vec::new();
        // open elements, innermost last
        let mut stack: Vec<Element> = Vec::new();
        loop {
            let pos = reader.buffer_position();
            let ev = reader
                .read_event_into(&mut buf)
                .map_err(|e| Error::Xml(format!("{e} (near byte {pos})")))?;
            match ev {
                XmlEvent::Eof => break,
                XmlEvent::Start(bs) => stack.push(Element::try_from(&bs)?),
                XmlEvent::Empty(bs) => {
                    let el = Element::try_from(&bs)?;
                    attach(&mut stack, &mut top, Node::Element(el));
                }
                XmlEvent::End(_) => {
                    let el = stack
                        .pop()
                        .ok_or_else(|| Error::Xml(format!("unexpected end tag near byte {pos}")))?;
                    attach(&mut stack, &mut top, Node::Element(el));
                }
                XmlEvent::Text(t) => {
                    let content = utf8(&t.into_inner())?;
                    attach(&mut stack, &mut top, Node::Text(content));
                }
                XmlEvent::CData(c) => {
                    let content = utf8(&c.into_inner())?;
                    attach(&mut stack, &mut top, Node::CData(content));
                }
                XmlEvent::Comment(c) => {
                    let content = utf8(&c.into_inner())?;
                    attach(&mut stack, &mut top, Node::Comment(content));
                }
                other => {
                    let node = Node::Other(RawXmlEvent(other.into_owned()));
                    attach(&mut stack, &mut top, node);
                }
            }
            buf.clear();
        }
        if let Some(open) = stack.last() {
            return Err(Error::Xml(format!("unclosed element '{}'", open.name())));
        }
        Ok(Self::new(top))
    }

    pub fn write_to(&self, writer: &mut dyn Write) -> Result<()> {
        let mut writer = Writer::new(writer);
        for node in self.nodes() {
            write_node(&mut writer, node)?;
        }
        Ok(())
    }
}

fn write_event<W: Write>(writer: &mut Writer<W>, event: XmlEvent) -> Result<()> {
    writer.write_event(event).map_err(Error::from_err)
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &Node) -> Result<()> {
    match node {
        Node::Element(el) => {
            if el.children().is_empty() {
                write_event(writer, XmlEvent::Empty(el.into()))?;
            } else {
                write_event(writer, XmlEvent::Start(el.into()))?;
                for child in el.children() {
                    write_node(writer, child)?;
                }
                write_event(writer, XmlEvent::End(BytesEnd::new(el.name())))?;
            }
        }
        Node::Text(content) => write_event(writer, XmlEvent::Text(BytesText::from_escaped(content)))?,
        Node::CData(content) => write_event(writer, XmlEvent::CData(BytesCData::new(content)))?,
        Node::Comment(content) => {
            write_event(writer, XmlEvent::Comment(BytesText::from_escaped(content)))?
        }
        Node::Other(event) => write_event(writer, event.0.clone())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_minimal() {
        let doc: Document = "<svg></svg>".parse().unwrap();
        assert_eq!(doc.nodes().len(), 1);
        let root = doc.root().unwrap();
        assert_eq!(root.name(), "svg");
        assert!(root.children().is_empty());
    }

    #[test]
    fn test_document_roundtrip() {
        for input in [
            r#"<svg><rect width="100" height="100"/></svg>"#,
            r#"<?xml version="1.0"?>
<!-- comment -->
<svg xmlns="http://www.w3.org/2000/svg">
  <g transform="scale(2)"><text x="1">a &amp; b</text></g>
  <style><![CDATA[ rect { fill: red } ]]></style>
</svg>"#,
            r#"<svg><path d="M0 0" data-note="&quot;quoted&quot; &lt;tag&gt;"/></svg>"#,
        ] {
            let doc: Document = input.parse().unwrap();
            assert_eq!(doc.to_xml_string().unwrap(), input);
        }
    }

    #[test]
    fn test_attribute_values_unescaped() {
        let doc: Document = r#"<svg><path data-x="a &lt; b"/></svg>"#.parse().unwrap();
        let path = doc.root().unwrap().child_elements().next().unwrap();
        assert_eq!(path.get_attr("data-x"), Some("a < b"));
    }

    #[test]
    fn test_document_errors() {
        for input in ["<svg><g></svg>", "<svg>", "<svg a=1></svg>", "</g>"] {
            assert!(input.parse::<Document>().is_err(), "{input}");
        }
    }
}
