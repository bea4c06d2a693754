use serde::ser::{Serialize, SerializeMap, Serializer};

/// Value stored under one key of a [`Record`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// An attribute value.
    Text(String),
    /// A non-repeatable child element.
    Node(Record),
    /// A repeatable child element (`State`, `Delay`, `Good`, `Fail`, `Item`, `Package`).
    List(Vec<Record>),
}

impl Field {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Record> {
        match self {
            Self::Node(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Record]> {
        match self {
            Self::List(records) => Some(records),
            _ => None,
        }
    }
}

/// Parsed response element: attributes and child elements keyed by name.
///
/// Keys keep the order in which they first appeared in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    entries: Vec<(String, Field)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Field> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, field)| field)
    }

    /// Attribute value under `key`.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Field::as_text)
    }

    /// Non-repeatable child under `key`.
    pub fn node(&self, key: &str) -> Option<&Record> {
        self.get(key).and_then(Field::as_node)
    }

    /// Repeatable children under `key`; empty when there are none.
    pub fn list(&self, key: &str) -> &[Record] {
        self.get(key).and_then(Field::as_list).unwrap_or(&[])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Business error code attached by CDEK to this element (`ErrorCode`).
    pub fn error_code(&self) -> Option<&str> {
        self.text("ErrorCode")
    }

    /// Human-readable message attached by CDEK to this element (`Msg`).
    pub fn message(&self) -> Option<&str> {
        self.text("Msg")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.entries.iter().map(|(name, field)| (name.as_str(), field))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a value, replacing an existing key in place. Returns `true` if a value was
    /// replaced.
    pub(crate) fn insert(&mut self, key: impl Into<String>, field: Field) -> bool {
        let key = key.into();
        match self.entries.iter_mut().find(|(name, _)| *name == key) {
            Some((_, slot)) => {
                *slot = field;
                true
            }
            None => {
                self.entries.push((key, field));
                false
            }
        }
    }

    /// Append to the list under `key`, turning any non-list value into a fresh list.
    pub(crate) fn push_repeated(&mut self, key: &str, record: Record) {
        match self.entries.iter_mut().find(|(name, _)| name == key) {
            Some((_, Field::List(records))) => records.push(record),
            Some((_, slot)) => *slot = Field::List(vec![record]),
            None => self
                .entries
                .push((key.to_owned(), Field::List(vec![record]))),
        }
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(value) => serializer.serialize_str(value),
            Self::Node(record) => record.serialize(serializer),
            Self::List(records) => records.serialize(serializer),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, field) in &self.entries {
            map.serialize_entry(key, field)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_first_position() {
        let mut record = Record::new();
        assert!(!record.insert("A", Field::Text("1".to_owned())));
        assert!(!record.insert("B", Field::Text("2".to_owned())));
        assert!(record.insert("A", Field::Text("3".to_owned())));

        let keys: Vec<&str> = record.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, ["A", "B"]);
        assert_eq!(record.text("A"), Some("3"));
    }

    #[test]
    fn push_repeated_builds_list() {
        let mut record = Record::new();
        record.push_repeated("Item", Record::new());
        record.push_repeated("Item", Record::new());
        assert_eq!(record.list("Item").len(), 2);
        assert!(record.list("Package").is_empty());
    }

    #[test]
    fn serializes_as_json_object() {
        let mut item = Record::new();
        item.insert("Weight", Field::Text("500".to_owned()));
        let mut package = Record::new();
        package.push_repeated("Item", item);

        let json = serde_json::to_value(&package).unwrap();
        assert_eq!(json, serde_json::json!({ "Item": [{ "Weight": "500" }] }));
    }

    #[test]
    fn business_error_accessors() {
        let mut record = Record::new();
        record.insert("ErrorCode", Field::Text("ERR_AUTH".to_owned()));
        record.insert("Msg", Field::Text("denied".to_owned()));
        assert_eq!(record.error_code(), Some("ERR_AUTH"));
        assert_eq!(record.message(), Some("denied"));
    }
}
