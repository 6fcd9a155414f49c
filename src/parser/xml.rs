use std::borrow::Cow;
use std::io::Write;

use quick_xml::escape::{escape, unescape};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};

use crate::error::{ExportError, ImportError};

/// An element node: tag, attributes in document order, child elements.
///
/// Text content is not part of the XUI format and is not kept.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlNode {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlDocument {
    pub root: Option<XmlNode>,
}

impl XmlNode {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Appends an attribute. Callers are responsible for not repeating a key.
    pub fn push_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((key.into(), value.into()));
    }

    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn from_start(start: &BytesStart) -> Result<Self, String> {
        let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        if !is_name(&tag) {
            return Err(format!("invalid element name '{tag}'"));
        }

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| e.to_string())?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            if !is_name(&key) {
                return Err(format!("invalid attribute name '{key}' on <{tag}>"));
            }
            let raw = std::str::from_utf8(&attr.value).map_err(|e| e.to_string())?;
            attributes.push((key, attribute_value(raw).map_err(|e| format!("{e} in <{tag}>"))?));
        }

        Ok(Self {
            tag,
            attributes,
            children: Vec::new(),
        })
    }
}

impl XmlDocument {
    #[must_use]
    pub fn new(root: XmlNode) -> Self {
        Self { root: Some(root) }
    }

    /// Parses an XML document into an element tree.
    ///
    /// Comments, processing instructions, the declaration, doctype and text
    /// content are skipped. An input with no element at all yields a
    /// document without a root.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Malformed`] if the input is not well-formed:
    /// broken or unterminated tags, mismatched end tags, elements left open
    /// at end of input, duplicate attributes, invalid names, `<` inside an
    /// attribute value, unknown entity references, more than one root
    /// element, or text outside the root.
    pub fn parse(content: &str) -> Result<Self, ImportError> {
        let content = content.trim_start_matches('\u{feff}');

        let mut reader = Reader::from_str(content);
        reader.trim_text(true);

        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;

        loop {
            let position = reader.buffer_position();
            let event = reader.read_event().map_err(|e| ImportError::Malformed {
                position,
                message: e.to_string(),
            })?;
            let malformed = |message: String| ImportError::Malformed { position, message };

            match event {
                Event::Start(ref e) => {
                    let node = XmlNode::from_start(e).map_err(malformed)?;
                    stack.push(node);
                }
                Event::Empty(ref e) => {
                    let node = XmlNode::from_start(e).map_err(malformed)?;
                    attach(&mut stack, &mut root, node).map_err(malformed)?;
                }
                Event::End(ref e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    let node = match stack.pop() {
                        Some(node) if node.tag == name => node,
                        Some(node) => {
                            return Err(malformed(format!(
                                "expected </{}>, found </{name}>",
                                node.tag
                            )))
                        }
                        None => return Err(malformed(format!("unexpected </{name}>"))),
                    };
                    attach(&mut stack, &mut root, node).map_err(malformed)?;
                }
                Event::Text(ref t) => {
                    let text = t.unescape().map_err(|e| malformed(e.to_string()))?;
                    if stack.is_empty() && !text.trim().is_empty() {
                        return Err(malformed("text outside the root element".to_string()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(ImportError::Malformed {
                position: reader.buffer_position(),
                message: format!("unclosed element <{}>", open.tag),
            });
        }

        Ok(Self { root })
    }

    /// Writes the XML declaration followed by the tree, indented by two
    /// spaces. Nodes without children are written self-closing.
    pub fn write_to<W: Write>(&self, out: W) -> Result<(), ExportError> {
        let mut writer = Writer::new_with_indent(out, b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        if let Some(root) = &self.root {
            write_node(&mut writer, root)?;
        }

        writer
            .into_inner()
            .write_all(b"\n")
            .map_err(|e| ExportError::WriteError {
                message: e.to_string(),
            })
    }

    pub fn to_xml_string(&self) -> Result<String, ExportError> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        String::from_utf8(buf).map_err(|e| ExportError::WriteError {
            message: e.to_string(),
        })
    }
}

fn attach(
    stack: &mut [XmlNode],
    root: &mut Option<XmlNode>,
    node: XmlNode,
) -> Result<(), String> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        return Ok(());
    }

    if let Some(existing) = root {
        return Err(format!(
            "second root element <{}> after <{}>",
            node.tag, existing.tag
        ));
    }

    *root = Some(node);
    Ok(())
}

/// Decodes a raw attribute value: literal tabs and line breaks become
/// spaces (`\r\n` counts as one break), then references are resolved.
fn attribute_value(raw: &str) -> Result<String, String> {
    if raw.contains('<') {
        return Err("'<' in attribute value".to_string());
    }
    let normalized = raw.replace("\r\n", " ").replace(['\t', '\n', '\r'], " ");
    unescape(&normalized)
        .map(Cow::into_owned)
        .map_err(|e| e.to_string())
}

/// Escapes an attribute value so that whitespace survives any conforming
/// reader's attribute normalization.
fn escape_attribute(value: &str) -> String {
    escape(value)
        .replace('\n', "&#xA;")
        .replace('\t', "&#x9;")
        .replace('\r', "&#xD;")
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}')
}

/// True for a valid XML `Name`.
fn is_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(is_name_start_char) && chars.all(is_name_char)
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &XmlNode) -> Result<(), quick_xml::Error> {
    let mut start = BytesStart::new(node.tag.as_str());
    for (key, value) in &node.attributes {
        start.push_attribute(Attribute {
            key: QName(key.as_bytes()),
            value: Cow::Owned(escape_attribute(value).into_bytes()),
        });
    }

    if node.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &node.children {
        write_node(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(node.tag.as_str())))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_tree() {
        let doc = XmlDocument::parse(
            r#"<?xml version="1.0"?>
            <!-- layout -->
            <window name="main">
                <rect name="a" pos="1,2"/>
                <label name="b">ignored text<inner/></label>
            </window>"#,
        )
        .unwrap();

        let root = doc.root.unwrap();
        assert_eq!(root.tag, "window");
        assert_eq!(root.attribute("name"), Some("main"));
        assert_eq!(root.children.len(), 2);
        assert_eq!(
            root.children[0].attributes,
            vec![
                ("name".to_string(), "a".to_string()),
                ("pos".to_string(), "1,2".to_string()),
            ]
        );
        assert_eq!(root.children[1].children[0].tag, "inner");
    }

    #[test]
    fn test_parse_unescapes_attributes() {
        let doc = XmlDocument::parse(r#"<w t="a &amp; &lt;b&gt; &quot;c&quot;"/>"#).unwrap();
        assert_eq!(doc.root.unwrap().attribute("t"), Some(r#"a & <b> "c""#));
    }

    #[test]
    fn test_parse_empty_input_has_no_root() {
        assert_eq!(XmlDocument::parse("").unwrap().root, None);
        assert_eq!(XmlDocument::parse("<!-- nothing -->").unwrap().root, None);
    }

    #[test]
    fn test_parse_rejects_unterminated_tag() {
        let err = XmlDocument::parse(r#"<window name="x"><rect name="a""#).unwrap_err();
        assert!(matches!(err, ImportError::Malformed { .. }));
    }

    #[test]
    fn test_parse_rejects_unclosed_element() {
        let err = XmlDocument::parse(r#"<window name="x"><rect/>"#).unwrap_err();
        assert!(err.to_string().contains("unclosed element <window>"));
    }

    #[test]
    fn test_parse_rejects_mismatched_end() {
        assert!(XmlDocument::parse("<window><rect></window>").is_err());
    }

    #[test]
    fn test_parse_rejects_duplicate_attribute() {
        assert!(XmlDocument::parse(r#"<window><rect a="1" a="2"/></window>"#).is_err());
    }

    #[test]
    fn test_parse_rejects_second_root() {
        assert!(XmlDocument::parse("<window/><window/>").is_err());
    }

    #[test]
    fn test_parse_rejects_lt_in_attribute_value() {
        let err = XmlDocument::parse(r#"<window><rect name="a" t="<"/></window>"#).unwrap_err();
        assert!(matches!(err, ImportError::Malformed { .. }));
    }

    #[test]
    fn test_parse_rejects_unknown_entity_inside_root() {
        let err = XmlDocument::parse("<window>&bogus;<rect/></window>").unwrap_err();
        assert!(matches!(err, ImportError::Malformed { .. }));
    }

    #[test]
    fn test_parse_rejects_invalid_names() {
        assert!(XmlDocument::parse("<window><1rect/></window>").is_err());
        assert!(XmlDocument::parse(r#"<window><rect 9x="1"/></window>"#).is_err());
        assert!(XmlDocument::parse(r#"<ui:window xml:lang="en"><ui.rect-2 _a="1"/></ui:window>"#).is_ok());
    }

    #[test]
    fn test_parse_normalizes_attribute_whitespace() {
        let doc = XmlDocument::parse("<w t=\"a\tb\r\nc\nd &#xA;e\"/>").unwrap();
        assert_eq!(doc.root.unwrap().attribute("t"), Some("a b c d \ne"));
    }

    #[test]
    fn test_write_escapes_whitespace_in_attributes() {
        let mut root = XmlNode::new("window");
        root.push_attribute("text", "l1\nl2\tt\r");

        let xml = XmlDocument::new(root.clone()).to_xml_string().unwrap();
        let tag = xml.lines().nth(1).unwrap();
        assert!(!tag.contains(['\n', '\t', '\r']));
        assert!(tag.contains("l1&#xA;l2&#x9;t&#xD;"));

        let reparsed = XmlDocument::parse(&xml).unwrap();
        assert_eq!(reparsed.root, Some(root));
    }

    #[test]
    fn test_write_escapes_and_self_closes() {
        let mut root = XmlNode::new("window");
        root.push_attribute("name", "a<b");
        let mut child = XmlNode::new("rect");
        child.push_attribute("text", "\"quoted\" & more");
        root.children.push(child);

        let xml = XmlDocument::new(root.clone()).to_xml_string().unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("<rect text="));
        assert!(xml.contains("/>"));
        assert!(xml.trim_end().ends_with("</window>"));

        let reparsed = XmlDocument::parse(&xml).unwrap();
        assert_eq!(reparsed.root, Some(root));
    }
}
