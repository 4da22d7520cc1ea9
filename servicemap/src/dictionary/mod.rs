//! Keyword dictionary: service flag -> ordered search phrases
//!
//! Built from an external table where each row holds a flag name and a
//! comma-separated phrase blob. The built dictionary is immutable; a
//! [`DictionaryCache`] rebuilds it from its source once the TTL lapses.

pub mod source;

pub use source::{DictionarySource, FileDictionarySource};

use crate::cache::TtlCache;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// One row of the dictionary table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryRow {
    #[serde(default, alias = "service", alias = "Service", alias = "Flag")]
    pub flag: Option<String>,
    #[serde(default, alias = "phrases", alias = "keywords", alias = "Keywords")]
    pub phrases_blob: Option<String>,
}

impl DictionaryRow {
    pub fn new(flag: impl Into<String>, phrases_blob: impl Into<String>) -> Self {
        Self {
            flag: Some(flag.into()),
            phrases_blob: Some(phrases_blob.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordDictionary {
    entries: HashMap<String, Vec<String>>,
}

impl KeywordDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Phrases for a flag in dictionary order; empty when the flag has no entry.
    pub fn phrases(&self, flag: &str) -> &[String] {
        self.entries.get(flag).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, flag: &str) -> bool {
        self.entries.contains_key(flag)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<K, V, P> FromIterator<(K, V)> for KeywordDictionary
where
    K: Into<String>,
    V: IntoIterator<Item = P>,
    P: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }
}

/// Split a phrase blob on commas, trimming pieces and dropping empty ones.
pub fn split_phrases(blob: &str) -> Vec<String> {
    blob.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build a dictionary from table rows.
///
/// Rows without a flag name are skipped. A later row for the same flag
/// replaces the earlier one.
pub fn load_keyword_dictionary(rows: &[DictionaryRow]) -> KeywordDictionary {
    let mut entries = HashMap::with_capacity(rows.len());
    let mut skipped = 0usize;

    for row in rows {
        let flag = match row.flag.as_deref().map(str::trim) {
            Some(f) if !f.is_empty() => f,
            _ => {
                skipped += 1;
                continue;
            }
        };
        let phrases = row
            .phrases_blob
            .as_deref()
            .map(split_phrases)
            .unwrap_or_default();
        entries.insert(flag.to_string(), phrases);
    }

    if skipped > 0 {
        tracing::debug!(skipped, "Skipped dictionary rows without a flag name");
    }

    KeywordDictionary { entries }
}

/// Keyword dictionary memoized over a [`DictionarySource`]
pub struct DictionaryCache {
    source: Box<dyn DictionarySource>,
    cache: TtlCache<KeywordDictionary>,
}

impl DictionaryCache {
    pub fn new(source: Box<dyn DictionarySource>, ttl: Duration) -> Self {
        Self {
            source,
            cache: TtlCache::new("keyword_dictionary", ttl),
        }
    }

    /// Current dictionary, rebuilt from the source when stale.
    pub fn current(&self) -> Result<Arc<KeywordDictionary>> {
        self.cache.get_or_refresh(|| {
            let rows = self.source.load_rows()?;
            let dictionary = load_keyword_dictionary(&rows);
            tracing::info!(
                source = self.source.name(),
                rows = rows.len(),
                flags = dictionary.len(),
                "Loaded keyword dictionary"
            );
            Ok(dictionary)
        })
    }

    pub fn invalidate(&self) {
        self.cache.invalidate();
    }

    pub fn cache(&self) -> &TtlCache<KeywordDictionary> {
        &self.cache
    }
}
