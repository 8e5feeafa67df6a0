//! Locale identifiers and Accept-Language parsing.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use unic_langid::{langid, LanguageIdentifier};

use crate::error::{AcceptLanguageError, I18nError};

/// A parsed, canonicalized language tag such as `en`, `it` or `en-US`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale(LanguageIdentifier);

impl Locale {
    /// Parse a locale identifier (e.g., "en-US", "it_CH", "EN").
    ///
    /// Both `-` and `_` separators are accepted and the result is
    /// canonicalized, so `en_us` becomes `en-US`.
    pub fn parse(s: &str) -> Result<Self, I18nError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(I18nError::InvalidLocale {
                locale: s.to_string(),
                message: "empty identifier".to_string(),
            });
        }

        trimmed
            .parse::<LanguageIdentifier>()
            .map(Self)
            .map_err(|e| I18nError::InvalidLocale {
                locale: s.to_string(),
                message: e.to_string(),
            })
    }

    /// The built-in fallback locale.
    pub fn english() -> Self {
        Self(langid!("en"))
    }

    /// Canonical string form, used as the key into localization tables.
    pub fn code(&self) -> String {
        self.0.to_string()
    }

    /// Primary language subtag.
    pub fn language(&self) -> &str {
        self.0.language.as_str()
    }

    /// Region subtag, if any.
    pub fn region(&self) -> Option<&str> {
        self.0.region.as_ref().map(|r| r.as_str())
    }

    /// The underlying language identifier.
    pub fn langid(&self) -> &LanguageIdentifier {
        &self.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::english()
    }
}

impl FromStr for Locale {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<LanguageIdentifier> for Locale {
    fn from(id: LanguageIdentifier) -> Self {
        Self(id)
    }
}

/// Parse a ranked Accept-Language style value (e.g. "it-CH, it;q=0.9, en;q=0.5").
///
/// Entries are returned in descending weight, entries with equal weight keep
/// their original order. The `*` wildcard and entries with `q=0` are dropped.
/// A single malformed entry rejects the whole value.
pub fn parse_accept_language(value: &str) -> Result<Vec<(Locale, f32)>, AcceptLanguageError> {
    let mut preferences = Vec::new();

    for part in value.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let mut components = part.split(';');
        let tag = components.next().unwrap_or_default().trim();
        let mut weight = 1.0_f32;

        for param in components {
            let param = param.trim();
            if param.is_empty() {
                continue;
            }
            let (name, value) = param
                .split_once('=')
                .ok_or_else(|| AcceptLanguageError::InvalidWeight(param.to_string()))?;
            if name.trim().eq_ignore_ascii_case("q") {
                weight = value
                    .trim()
                    .parse::<f32>()
                    .ok()
                    .filter(|w| (0.0..=1.0).contains(w))
                    .ok_or_else(|| AcceptLanguageError::InvalidWeight(param.to_string()))?;
            }
        }

        if tag == "*" {
            continue;
        }

        let locale = Locale::parse(language_part(tag))
            .map_err(|_| AcceptLanguageError::InvalidTag(tag.to_string()))?;

        if weight > 0.0 {
            preferences.push((locale, weight));
        }
    }

    // Stable sort keeps header order between equal weights.
    preferences.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    Ok(preferences)
}

/// The language identifier part of a tag, without extension or private-use
/// sections (`it-IT-u-nu-latn` gives `it-IT`).
fn language_part(tag: &str) -> &str {
    let mut end = 0;
    for (i, subtag) in tag.split(['-', '_']).enumerate() {
        if i > 0 && subtag.len() == 1 {
            return &tag[..end];
        }
        end += if i == 0 { subtag.len() } else { subtag.len() + 1 };
    }
    tag
}
