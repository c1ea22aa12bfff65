use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single immutable `(url, code)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    pub url: String,
    pub code: String,
}

/// Point-in-time copy of the store, also the persisted record.
///
/// Both directions are written so the file stays readable by hand; on load
/// the forward map is authoritative. On disk the maps are named
/// `url_to_string` / `string_to_url`, the layout existing data files use;
/// `url_to_code` / `code_to_url` are accepted as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkData {
    #[serde(default, rename = "url_to_string", alias = "url_to_code")]
    pub url_to_code: BTreeMap<String, String>,
    #[serde(default, rename = "string_to_url", alias = "code_to_url")]
    pub code_to_url: BTreeMap<String, String>,
}

impl LinkData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = Entry>,
    {
        let mut data = Self::new();
        for entry in entries {
            data.code_to_url.insert(entry.code.clone(), entry.url.clone());
            data.url_to_code.insert(entry.url, entry.code);
        }
        data
    }

    pub fn len(&self) -> usize {
        self.url_to_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.url_to_code.is_empty() && self.code_to_url.is_empty()
    }

    /// True when both maps describe the same one-to-one relation.
    pub fn is_consistent(&self) -> bool {
        self.url_to_code.len() == self.code_to_url.len()
            && self
                .url_to_code
                .iter()
                .all(|(url, code)| self.code_to_url.get(code) == Some(url))
    }
}
