use std::collections::HashMap;

use serde::{Serialize, Serializer};

/// Payload stored for a matched document.
///
/// A hit with neither projected fields nor a stored document is still part of
/// the result; it carries [`Payload::Empty`] rather than being left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Raw bytes as returned by the backend (JSON for Elasticsearch)
    Document(Vec<u8>),

    /// The backend returned no payload for this id
    Empty,
}

impl Payload {
    /// Decodes the payload as JSON. Non-JSON bytes come back as a string and
    /// `Empty` as null.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Payload::Empty => serde_json::Value::Null,
            Payload::Document(bytes) => serde_json::from_slice(bytes).unwrap_or_else(|_| {
                serde_json::Value::String(String::from_utf8_lossy(bytes).into_owned())
            }),
        }
    }
}

impl From<Option<Vec<u8>>> for Payload {
    fn from(bytes: Option<Vec<u8>>) -> Self {
        bytes.map_or(Payload::Empty, Payload::Document)
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Matched documents keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    entries: HashMap<String, Payload>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a hit. A later hit with the same id replaces the earlier one.
    pub fn insert(&mut self, id: impl Into<String>, payload: Payload) {
        self.entries.insert(id.into(), payload);
    }

    pub fn get(&self, id: &str) -> Option<&Payload> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Payload)> {
        self.entries.iter()
    }
}

impl IntoIterator for ResultSet {
    type Item = (String, Payload);
    type IntoIter = std::collections::hash_map::IntoIter<String, Payload>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
