//! Weighted matching of requested locales against the supported set.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::I18nError;
use crate::locale::{parse_accept_language, Locale};

/// How closely a requested locale matches a supported one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Confidence {
    /// Different language, or conflicting scripts.
    No,
    /// Same language, different regions (`en-GB` vs `en-US`).
    Low,
    /// Same language, one side leaves script or region unspecified (`it-CH` vs `it`).
    High,
    /// All subtags equal.
    Exact,
}

/// Lowest confidence accepted as a match.
pub const MIN_CONFIDENCE: Confidence = Confidence::Low;

/// Score how well `supported` serves a request for `desired`.
pub fn confidence(desired: &Locale, supported: &Locale) -> Confidence {
    let (d, s) = (desired.langid(), supported.langid());

    if d.language != s.language {
        return Confidence::No;
    }
    if let (Some(a), Some(b)) = (&d.script, &s.script) {
        if a != b {
            return Confidence::No;
        }
    }
    if d == s {
        return Confidence::Exact;
    }
    match (&d.region, &s.region) {
        (Some(a), Some(b)) if a != b => Confidence::Low,
        _ => Confidence::High,
    }
}

/// Immutable matcher over an ordered set of supported locales.
///
/// The first supported locale is the default. Resolution is pure: the same
/// candidate always yields the same supported locale.
#[derive(Debug, Clone)]
pub struct LocaleMatcher {
    supported: Vec<Locale>,
    /// Canonical code -> position in `supported`.
    index: HashMap<String, usize>,
}

impl LocaleMatcher {
    /// Build a matcher, substituting English when no locale is given.
    pub fn new<S: AsRef<str>>(locales: &[S]) -> Result<Self, I18nError> {
        let parsed = parse_all(locales)?;
        if parsed.is_empty() {
            warn!(
                fallback = %Locale::english(),
                "no supported locales configured, using built-in default"
            );
            return Ok(Self::build(vec![Locale::english()]));
        }
        Ok(Self::build(parsed))
    }

    /// Build a matcher, rejecting an empty locale list.
    pub fn strict<S: AsRef<str>>(locales: &[S]) -> Result<Self, I18nError> {
        let parsed = parse_all(locales)?;
        if parsed.is_empty() {
            return Err(I18nError::NoLocales);
        }
        Ok(Self::build(parsed))
    }

    fn build(supported: Vec<Locale>) -> Self {
        let mut index = HashMap::with_capacity(supported.len());
        for (i, locale) in supported.iter().enumerate() {
            index.entry(locale.code()).or_insert(i);
        }
        debug!(
            locales = ?supported.iter().map(Locale::code).collect::<Vec<_>>(),
            "locale matcher built"
        );
        Self { supported, index }
    }

    /// Supported locales in preference order.
    pub fn supported(&self) -> &[Locale] {
        &self.supported
    }

    /// The default locale (first supported).
    pub fn default_locale(&self) -> &Locale {
        &self.supported[0]
    }

    /// Whether `code` names a supported locale exactly.
    pub fn is_supported(&self, code: &str) -> bool {
        Locale::parse(code)
            .map(|l| self.index.contains_key(&l.code()))
            .unwrap_or(false)
    }

    /// Resolve a raw candidate (empty, a single tag, or a ranked
    /// Accept-Language value) to a supported locale. Never fails.
    pub fn resolve(&self, candidate: &str) -> &Locale {
        self.resolve_with_confidence(candidate).0
    }

    /// Like [`resolve`](Self::resolve), also reporting the match confidence.
    /// Falling back to the default reports [`Confidence::No`].
    pub fn resolve_with_confidence(&self, candidate: &str) -> (&Locale, Confidence) {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return (self.default_locale(), Confidence::No);
        }

        if let Some(&i) = self.index.get(candidate) {
            return (self.locale_at(i), Confidence::Exact);
        }

        let preferences = match parse_accept_language(candidate) {
            Ok(preferences) => preferences,
            Err(error) => {
                debug!(candidate, %error, "unparseable locale candidate, using default");
                return (self.default_locale(), Confidence::No);
            }
        };

        match self.best_match(&preferences) {
            Some((i, confidence)) => (self.locale_at(i), confidence),
            None => (self.default_locale(), Confidence::No),
        }
    }

    /// First preference whose best supported match clears [`MIN_CONFIDENCE`].
    /// Ties between supported locales go to the earlier one.
    fn best_match(&self, preferences: &[(Locale, f32)]) -> Option<(usize, Confidence)> {
        for (desired, _weight) in preferences {
            let mut best: Option<(usize, Confidence)> = None;
            for (i, supported) in self.supported.iter().enumerate() {
                let score = confidence(desired, supported);
                if best.map_or(true, |(_, b)| score > b) {
                    best = Some((i, score));
                }
            }
            if let Some((i, score)) = best {
                if score >= MIN_CONFIDENCE {
                    return Some((i, score));
                }
            }
        }
        None
    }

    fn locale_at(&self, i: usize) -> &Locale {
        self.supported.get(i).unwrap_or_else(|| self.default_locale())
    }
}

fn parse_all<S: AsRef<str>>(locales: &[S]) -> Result<Vec<Locale>, I18nError> {
    locales.iter().map(|l| Locale::parse(l.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    fn matcher(locales: &[&str]) -> LocaleMatcher {
        LocaleMatcher::new(locales).unwrap()
    }

    #[test_case("", "en" ; "empty candidate")]
    #[test_case("   ", "en" ; "blank candidate")]
    #[test_case("it", "it" ; "exact language")]
    #[test_case("it-CH", "it" ; "region falls back to language")]
    #[test_case("IT_ch", "it" ; "non canonical spelling")]
    #[test_case("en", "en" ; "default exact")]
    #[test_case("xx-ZZ", "en" ; "unknown language")]
    #[test_case("de, fr;q=0.8", "en" ; "no acceptable candidate")]
    #[test_case("de, it;q=0.8", "it" ; "second preference")]
    #[test_case("en;q=0.2, it;q=0.9", "it" ; "weights override order")]
    #[test_case("it;q=abc", "en" ; "malformed weight")]
    #[test_case("!!, it", "en" ; "malformed tag")]
    #[test_case("*", "en" ; "wildcard only")]
    #[test_case("it-IT-u-nu-latn, it;q=0.9", "it" ; "extension subtags")]
    #[test_case("en-x-twain;q=0.2, it-x-pig", "it" ; "private use subtags")]
    fn test_resolve(candidate: &str, expected: &str) {
        let m = matcher(&["en", "it"]);
        assert_eq!(m.resolve(candidate).code(), expected);
    }

    #[test]
    fn test_resolve_prefers_specific_region() {
        let m = matcher(&["en", "en-GB", "it"]);
        assert_eq!(m.resolve("en-GB").code(), "en-GB");
        assert_eq!(m.resolve("en-US").code(), "en");
        assert_eq!(m.resolve("en").code(), "en");
    }

    #[test]
    fn test_resolve_region_mismatch_is_acceptable() {
        let m = matcher(&["it", "en-US"]);
        let (locale, confidence) = m.resolve_with_confidence("en-GB");
        assert_eq!(locale.code(), "en-US");
        assert_eq!(confidence, Confidence::Low);
    }

    #[test]
    fn test_resolve_tie_goes_to_earlier_supported() {
        let m = matcher(&["fr", "en-US", "en-GB"]);
        assert_eq!(m.resolve("en").code(), "en-US");
    }

    #[test]
    fn test_resolve_conflicting_script_does_not_match() {
        let m = matcher(&["en", "zh-Hans"]);
        assert_eq!(m.resolve("zh-Hant").code(), "en");
        assert_eq!(m.resolve("zh").code(), "zh-Hans");
    }

    #[test]
    fn test_resolve_with_confidence() {
        let m = matcher(&["en", "it"]);
        assert_eq!(m.resolve_with_confidence("it").1, Confidence::Exact);
        assert_eq!(m.resolve_with_confidence("it-IT").1, Confidence::High);
        assert_eq!(m.resolve_with_confidence("ja").1, Confidence::No);
        assert_eq!(m.resolve_with_confidence("").1, Confidence::No);
    }

    #[test]
    fn test_confidence_ordering() {
        assert!(Confidence::Exact > Confidence::High);
        assert!(Confidence::High > Confidence::Low);
        assert!(Confidence::Low > Confidence::No);
        assert!(MIN_CONFIDENCE > Confidence::No);
    }

    #[test]
    fn test_empty_locales_use_builtin_default() {
        let m = LocaleMatcher::new::<&str>(&[]).unwrap();
        assert_eq!(m.supported().len(), 1);
        assert_eq!(m.default_locale().code(), "en");
        assert_eq!(m.resolve("it").code(), "en");
    }

    #[test]
    fn test_strict_rejects_empty_locales() {
        let result = LocaleMatcher::strict::<&str>(&[]);
        assert!(matches!(result, Err(I18nError::NoLocales)));
    }

    #[test]
    fn test_invalid_locale_is_config_error() {
        let result = LocaleMatcher::new(&["en", "not a locale"]);
        assert!(matches!(
            result,
            Err(I18nError::InvalidLocale { ref locale, .. }) if locale == "not a locale"
        ));
    }

    #[test]
    fn test_supported_order_and_default() {
        let m = matcher(&["it", "en"]);
        assert_eq!(m.default_locale().code(), "it");
        assert_eq!(m.resolve("").code(), "it");
        assert_eq!(m.resolve("ja").code(), "it");
        assert!(m.is_supported("en"));
        assert!(m.is_supported("EN"));
        assert!(!m.is_supported("en-US"));
    }

    proptest! {
        #[test]
        fn resolve_is_deterministic_and_supported(candidate in "[a-zA-Z_,;=.0-9 *-]{0,24}") {
            let m = matcher(&["en", "it", "en-GB", "zh-Hant"]);
            let first = m.resolve(&candidate).clone();
            let second = m.resolve(&candidate).clone();
            prop_assert_eq!(&first, &second);
            prop_assert!(m.supported().contains(&first));
        }
    }
}
