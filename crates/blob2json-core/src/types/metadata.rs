//! Free-form blob metadata.
//!
//! Metadata is a flat mapping from string keys to string values. It is
//! embedded in the envelope as a JSON object and omitted entirely when empty.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use derive_more::{AsRef, Deref, From};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Key-unique string metadata attached to an envelope.
///
/// Keys are kept ordered so the rendered JSON is deterministic. Consumers
/// should still compare parsed maps rather than raw strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[derive(AsRef, Deref, From)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, String>);

impl Metadata {
    /// Creates empty metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a pair, returning the previous value for the key if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Adds a pair and returns the updated metadata.
    #[must_use]
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Returns `Some(self)` when at least one pair is present.
    #[must_use]
    pub fn into_non_empty(self) -> Option<Self> {
        (!self.0.is_empty()).then_some(self)
    }

    /// Consumes the metadata and returns the underlying map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl<K, V> FromIterator<(K, V)> for Metadata
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl FromIterator<MetadataEntry> for Metadata {
    fn from_iter<I: IntoIterator<Item = MetadataEntry>>(iter: I) -> Self {
        let mut metadata = Self::new();
        metadata.extend(iter);
        metadata
    }
}

impl Extend<MetadataEntry> for Metadata {
    fn extend<I: IntoIterator<Item = MetadataEntry>>(&mut self, iter: I) {
        for entry in iter {
            self.0.insert(entry.key, entry.value);
        }
    }
}

impl IntoIterator for Metadata {
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;
    type Item = (String, String);

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A single `key=value` metadata pair.
///
/// Parsing splits on the first `=`, so values may themselves contain `=`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetadataEntry {
    /// Metadata key.
    pub key: String,
    /// Metadata value.
    pub value: String,
}

impl MetadataEntry {
    /// Creates a new entry.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl FromStr for MetadataEntry {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (key, value) = s.split_once('=').ok_or_else(|| {
            Error::invalid_input()
                .with_message(format!("invalid metadata {s:?}; expected key=value"))
        })?;

        Ok(Self::new(key, value))
    }
}

impl fmt::Display for MetadataEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

impl From<MetadataEntry> for (String, String) {
    fn from(entry: MetadataEntry) -> Self {
        (entry.key, entry.value)
    }
}
