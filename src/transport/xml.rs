//! Request document encoding and response document decoding.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

use super::clean::filter_absent_pairs;
use crate::domain::{AttrValue, Element, Field, Record};

/// Child tags that always decode into a list, even when they occur once.
pub const ARRAY_TAGS: [&str; 6] = ["State", "Delay", "Good", "Fail", "Item", "Package"];

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("cannot encode document: {0}")]
    Encoding(String),

    #[error("malformed document: {0}")]
    Malformed(String),
}

/// Element of a parsed response document, before conversion into a [`Record`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First direct child named `name`.
    pub fn find(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Direct children named `name`.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Direct children (of any tag) carrying attribute `name`.
    pub fn children_with_attribute<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a XmlNode> {
        self.children
            .iter()
            .filter(move |child| child.attr(name).is_some())
    }

    /// Convert into a [`Record`].
    ///
    /// Attributes come first. Children listed in [`ARRAY_TAGS`] are collected into lists;
    /// any other repeated child tag keeps only its last occurrence.
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        for (key, value) in &self.attributes {
            record.insert(key.as_str(), Field::Text(value.clone()));
        }

        for child in &self.children {
            if ARRAY_TAGS.contains(&child.name.as_str()) {
                record.push_repeated(&child.name, child.to_record());
            } else if record.insert(child.name.as_str(), Field::Node(child.to_record())) {
                tracing::debug!(
                    parent = %self.name,
                    tag = %child.name,
                    "repeated element replaced the previous occurrence"
                );
            }
        }
        record
    }
}

/// Serialize a request document as UTF-8 XML with a declaration.
///
/// Absent attributes are dropped at every depth; `root` itself is left untouched.
pub fn serialize(root: &Element) -> Result<Vec<u8>, DocumentError> {
    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|err| DocumentError::Encoding(err.to_string()))?;
    write_element(&mut writer, root)?;
    Ok(writer.into_inner())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), DocumentError> {
    check_name(element.name())?;

    let mut start = BytesStart::new(element.name());
    let attributes = filter_absent_pairs(element.attributes().iter().cloned());
    for (name, value) in &attributes {
        check_name(name)?;
        if let AttrValue::Decimal(number) = value {
            if !number.is_finite() {
                return Err(DocumentError::Encoding(format!(
                    "attribute {name} is not a finite number: {number}"
                )));
            }
        }
        let text = value.to_text();
        check_text(name, &text)?;
        start.push_attribute((name.as_str(), text.as_str()));
    }

    if element.children().is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|err| DocumentError::Encoding(err.to_string()));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|err| DocumentError::Encoding(err.to_string()))?;
    for child in element.children() {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name())))
        .map_err(|err| DocumentError::Encoding(err.to_string()))
}

fn check_name(name: &str) -> Result<(), DocumentError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => chars
            .all(|ch| ch.is_alphanumeric() || matches!(ch, '_' | '-' | '.')),
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(DocumentError::Encoding(format!("invalid XML name: {name:?}")))
    }
}

/// XML 1.0 `Char` production. Surrogates cannot occur in a `char`.
fn is_xml_char(ch: char) -> bool {
    matches!(
        ch,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..
    )
}

fn check_text(name: &str, text: &str) -> Result<(), DocumentError> {
    let invalid = text.chars().find(|&ch| !is_xml_char(ch));
    match invalid {
        Some(ch) => Err(DocumentError::Encoding(format!(
            "attribute {name} contains a character not allowed in XML: {:?}",
            ch
        ))),
        None => Ok(()),
    }
}

/// Parse a response document into a [`Record`] of its root element.
pub fn parse(raw: &[u8]) -> Result<Record, DocumentError> {
    Ok(parse_tree(raw)?.to_record())
}

/// Parse a response document into its element tree.
///
/// Character data inside elements is ignored; CDEK carries everything in attributes.
pub fn parse_tree(raw: &[u8]) -> Result<XmlNode, DocumentError> {
    let mut reader = Reader::from_reader(raw);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|err| malformed(&reader, err))?;

        match event {
            Event::Start(start) => {
                ensure_single_root(&root)?;
                stack.push(open_node(&start)?);
            }
            Event::Empty(start) => {
                ensure_single_root(&root)?;
                let node = open_node(&start)?;
                close_node(&mut stack, &mut root, node);
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| DocumentError::Malformed("unexpected closing tag".to_owned()))?;
                close_node(&mut stack, &mut root, node);
            }
            Event::Text(text) => {
                if stack.is_empty() && !text.iter().all(u8::is_ascii_whitespace) {
                    return Err(DocumentError::Malformed(
                        "text outside of the root element".to_owned(),
                    ));
                }
            }
            Event::CData(_) => {
                if stack.is_empty() {
                    return Err(DocumentError::Malformed(
                        "CDATA outside of the root element".to_owned(),
                    ));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(DocumentError::Malformed(format!(
            "unclosed element <{}>",
            open.name
        )));
    }
    root.ok_or_else(|| DocumentError::Malformed("document has no root element".to_owned()))
}

fn ensure_single_root(root: &Option<XmlNode>) -> Result<(), DocumentError> {
    match root {
        Some(existing) => Err(DocumentError::Malformed(format!(
            "content after the root element <{}>",
            existing.name
        ))),
        None => Ok(()),
    }
}

fn open_node(start: &BytesStart<'_>) -> Result<XmlNode, DocumentError> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|err| DocumentError::Malformed(err.to_string()))?
        .to_owned();

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|err| DocumentError::Malformed(err.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|err| DocumentError::Malformed(err.to_string()))?
            .to_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| DocumentError::Malformed(err.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(XmlNode {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn close_node(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => *root = Some(node),
    }
}

fn malformed(reader: &Reader<&[u8]>, err: quick_xml::Error) -> DocumentError {
    DocumentError::Malformed(format!(
        "{err} (at byte {})",
        reader.error_position()
    ))
}
