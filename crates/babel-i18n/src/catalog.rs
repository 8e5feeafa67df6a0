//! Localization entries, per-locale catalogs and the localization table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::I18nError;
use crate::locale::Locale;

/// Singular and plural templates for one message key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawLocalization")]
pub struct Localization {
    /// Template used when `plural` is false.
    pub one: String,
    /// Template used when `plural` is true.
    pub other: String,
}

/// File shape; `other` may be omitted and then repeats `one`.
#[derive(Deserialize)]
struct RawLocalization {
    one: String,
    #[serde(default)]
    other: Option<String>,
}

impl From<RawLocalization> for Localization {
    fn from(raw: RawLocalization) -> Self {
        let other = raw.other.unwrap_or_else(|| raw.one.clone());
        Self {
            one: raw.one,
            other,
        }
    }
}

impl Localization {
    /// Entry with explicit singular and plural templates.
    pub fn new(one: impl Into<String>, other: impl Into<String>) -> Self {
        Self {
            one: one.into(),
            other: other.into(),
        }
    }

    /// Select the template for the requested plurality.
    pub fn template(&self, plural: bool) -> &str {
        if plural {
            &self.other
        } else {
            &self.one
        }
    }
}

/// Messages of a single locale, keyed by message key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: HashMap<String, Localization>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry (for building catalogs in code).
    pub fn insert(&mut self, key: impl Into<String>, localization: Localization) {
        self.entries.insert(key.into(), localization);
    }

    /// Look up an entry.
    pub fn get(&self, key: &str) -> Option<&Localization> {
        self.entries.get(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Message keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, Localization)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (K, Localization)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Catalogs for every loaded locale, keyed by canonical locale code.
///
/// Built once during setup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct LocalizationTable {
    catalogs: HashMap<String, Catalog>,
}

impl LocalizationTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a plain `locale -> key -> entry` map.
    ///
    /// Locale keys are canonicalized, so `en_us` and `en-US` land on the
    /// same catalog.
    pub fn from_map<L, K>(map: HashMap<L, HashMap<K, Localization>>) -> Result<Self, I18nError>
    where
        L: AsRef<str>,
        K: Into<String>,
    {
        let mut table = Self::new();
        for (locale, entries) in map {
            let locale = Locale::parse(locale.as_ref())?;
            table.insert(&locale, entries.into_iter().collect());
        }
        Ok(table)
    }

    /// Install (or replace) the catalog of a locale.
    pub fn insert(&mut self, locale: &Locale, catalog: Catalog) {
        self.catalogs.insert(locale.code(), catalog);
    }

    /// Catalog for a locale code, canonicalizing it first.
    pub fn get(&self, code: &str) -> Option<&Catalog> {
        if let Some(catalog) = self.catalogs.get(code) {
            return Some(catalog);
        }
        Locale::parse(code)
            .ok()
            .and_then(|locale| self.catalogs.get(&locale.code()))
    }

    /// Whether a catalog exists for `code`.
    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Loaded locale codes, in no particular order.
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.catalogs.keys().map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }
}
