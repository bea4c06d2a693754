use std::fmt;

use chrono::{NaiveDate, NaiveTime};

/// Scalar attribute value of a request document.
///
/// Every variant has one canonical text form (see [`AttrValue::to_text`]).
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Text(String),
    Integer(i64),
    Decimal(f64),
    Bool(bool),
    /// Serialized as `YYYY-MM-DD`.
    Date(NaiveDate),
    /// Serialized as `HH:MM:SS`.
    Time(NaiveTime),
}

impl AttrValue {
    /// Canonical text form as written to the wire.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => f.write_str(value),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Decimal(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Date(value) => write!(f, "{}", value.format("%Y-%m-%d")),
            Self::Time(value) => write!(f, "{}", value.format("%H:%M:%S")),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for AttrValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u32> for AttrValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<usize> for AttrValue {
    fn from(value: usize) -> Self {
        Self::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDate> for AttrValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveTime> for AttrValue {
    fn from(value: NaiveTime) -> Self {
        Self::Time(value)
    }
}

/// One node of a request document: a tag, ordered attributes and ordered children.
///
/// Attributes may be present with an absent (`None`) value; absent values are
/// dropped when the document is serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, Option<AttrValue>)>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style [`Element::set_attr`].
    pub fn with_attr(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder-style [`Element::set_opt_attr`].
    pub fn with_opt_attr<V: Into<AttrValue>>(mut self, name: &str, value: Option<V>) -> Self {
        self.set_opt_attr(name, value);
        self
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, name: &str, value: impl Into<AttrValue>) {
        self.set_opt_attr(name, Some(value));
    }

    /// Set an attribute that may be absent.
    pub fn set_opt_attr<V: Into<AttrValue>>(&mut self, name: &str, value: Option<V>) {
        let value = value.map(Into::into);
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => *slot = value,
            None => self.attributes.push((name.to_owned(), value)),
        }
    }

    /// Present value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.as_ref())
    }

    /// Append a child and return its index among this element's children.
    pub fn push_child(&mut self, child: Element) -> usize {
        self.children.push(child);
        self.children.len() - 1
    }

    pub fn child(&self, index: usize) -> Option<&Element> {
        self.children.get(index)
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut Element> {
        self.children.get_mut(index)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All attributes in insertion order, including absent ones.
    pub fn attributes(&self) -> &[(String, Option<AttrValue>)] {
        &self.attributes
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }
}
