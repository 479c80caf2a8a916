use http::HeaderMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Insertion-ordered header mapping with lower-cased, unique names.
///
/// Names are normalized once, on insert. A repeated name keeps its first
/// position but takes the value of its last occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderBag {
    entries: Vec<(String, String)>,
}

impl HeaderBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        let name = name.to_ascii_lowercase();
        let value = value.into();

        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<&HeaderMap> for HeaderBag {
    fn from(headers: &HeaderMap) -> Self {
        let mut bag = HeaderBag::new();
        for (name, value) in headers.iter() {
            // Opaque bytes are kept rather than dropped; obs-text is rare but legal.
            bag.insert(name.as_str(), String::from_utf8_lossy(value.as_bytes()));
        }
        bag
    }
}

impl Serialize for HeaderBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
