//! Locale matching and message translation.
//!
//! An [`I18n`] value holds the supported locales and every loaded catalog.
//! It is built once and then only read, so it can be shared behind an `Arc`
//! by any number of request handlers.
//!
//! ```no_run
//! use babel_i18n::{t, I18n, I18nConfig};
//!
//! let i18n = I18n::new(&I18nConfig::with_path(["en", "it"], "localizations"))?;
//! let locale = i18n.match_locale("it-CH, en;q=0.5").code();
//! let message = t!(i18n, &locale, "GEM", "Marco");
//! # Ok::<(), babel_i18n::I18nError>(())
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod format;
pub mod loader;
pub mod locale;
pub mod matcher;

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

pub use catalog::{Catalog, Localization, LocalizationTable};
pub use config::{
    default_lookup_strategy, ConfigError, ConfigLoader, HttpLocalePosition, I18nConfig,
    LocaleSource,
};
pub use error::{AcceptLanguageError, I18nError};
pub use format::{sprintf, Arg};
pub use loader::Format;
pub use locale::{parse_accept_language, Locale};
pub use matcher::{Confidence, LocaleMatcher, MIN_CONFIDENCE};

/// Supported locales plus their localizations.
#[derive(Debug, Clone)]
pub struct I18n {
    matcher: LocaleMatcher,
    table: LocalizationTable,
    default_code: String,
}

impl I18n {
    /// Set up from configuration.
    ///
    /// Localizations come from `config.path` when set, otherwise from
    /// `config.localizations`.
    pub fn new(config: &I18nConfig) -> Result<Self, I18nError> {
        config.validate()?;

        let matcher = if config.strict_locales {
            LocaleMatcher::strict(config.locales.as_slice())?
        } else {
            LocaleMatcher::new(config.locales.as_slice())?
        };

        let table = match (&config.path, &config.localizations) {
            (Some(path), _) => loader::load_dir(path, matcher.supported())?,
            (None, Some(localizations)) => LocalizationTable::from_map(localizations.clone())?,
            (None, None) => return Err(I18nError::MissingSource),
        };

        Ok(Self::from_parts(matcher, table))
    }

    /// Set up from a YAML config file.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, I18nError> {
        let config = ConfigLoader::load(path)?;
        Self::new(&config)
    }

    /// Set up from raw encoded localizations, one blob per locale.
    pub fn from_bytes<S, L, B>(
        locales: &[S],
        format: Format,
        blobs: &HashMap<L, B>,
    ) -> Result<Self, I18nError>
    where
        S: AsRef<str>,
        L: AsRef<str>,
        B: AsRef<[u8]>,
    {
        let matcher = LocaleMatcher::new(locales)?;
        let table = LocalizationTable::from_bytes(format, blobs)?;
        Ok(Self::from_parts(matcher, table))
    }

    /// Combine an existing matcher and table.
    pub fn from_parts(matcher: LocaleMatcher, table: LocalizationTable) -> Self {
        let default_code = matcher.default_locale().code();
        info!(
            default = %default_code,
            supported = matcher.supported().len(),
            catalogs = table.len(),
            "i18n ready"
        );
        Self {
            matcher,
            table,
            default_code,
        }
    }

    /// Translate `key` for `locale`.
    ///
    /// A locale without a catalog uses the default locale's catalog. A
    /// missing key is returned unchanged. `plural` selects the `other`
    /// template instead of `one`.
    pub fn translate(&self, locale: &str, plural: bool, key: &str, args: &[Arg]) -> String {
        let catalog = match self.table.get(locale) {
            Some(catalog) => Some(catalog),
            None => {
                debug!(locale, fallback = %self.default_code, "no catalog for locale");
                self.table.get(&self.default_code)
            }
        };

        match catalog.and_then(|c| c.get(key)) {
            Some(entry) => sprintf(entry.template(plural), args),
            None => {
                debug!(locale, key, "missing translation");
                key.to_string()
            }
        }
    }

    /// Singular translation.
    pub fn t(&self, locale: &str, key: &str, args: &[Arg]) -> String {
        self.translate(locale, false, key, args)
    }

    /// Plural translation.
    pub fn tp(&self, locale: &str, key: &str, args: &[Arg]) -> String {
        self.translate(locale, true, key, args)
    }

    /// Resolve an explicit locale code or Accept-Language value.
    pub fn match_locale(&self, candidate: &str) -> &Locale {
        self.matcher.resolve(candidate)
    }

    /// Supported locales, default first.
    pub fn supported_locales(&self) -> &[Locale] {
        self.matcher.supported()
    }

    /// Locale used when nothing better matches.
    pub fn default_locale(&self) -> &Locale {
        self.matcher.default_locale()
    }

    /// Whether a catalog was loaded for `code`.
    pub fn has_locale(&self, code: &str) -> bool {
        self.table.contains(code)
    }

    /// The underlying locale matcher.
    pub fn matcher(&self) -> &LocaleMatcher {
        &self.matcher
    }

    /// The loaded localizations.
    pub fn table(&self) -> &LocalizationTable {
        &self.table
    }
}

/// Singular translation with inline arguments.
///
/// ```ignore
/// t!(i18n, "it", "GEM", "Marco")
/// ```
#[macro_export]
macro_rules! t {
    ($i18n:expr, $locale:expr, $key:expr) => {
        $i18n.t($locale, $key, &[])
    };
    ($i18n:expr, $locale:expr, $key:expr, $($arg:expr),+ $(,)?) => {
        $i18n.t($locale, $key, &[$($crate::Arg::from($arg)),+])
    };
}

/// Plural translation with inline arguments.
#[macro_export]
macro_rules! tp {
    ($i18n:expr, $locale:expr, $key:expr) => {
        $i18n.tp($locale, $key, &[])
    };
    ($i18n:expr, $locale:expr, $key:expr, $($arg:expr),+ $(,)?) => {
        $i18n.tp($locale, $key, &[$($crate::Arg::from($arg)),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gem_i18n() -> I18n {
        let localizations = HashMap::from([
            (
                "en".to_string(),
                HashMap::from([
                    (
                        "GEM".to_string(),
                        Localization::new("Something went wrong %s", "Some things went wrong %s"),
                    ),
                    (
                        "ITEMS".to_string(),
                        Localization::new("%d item", "%d items"),
                    ),
                ]),
            ),
            (
                "it".to_string(),
                HashMap::from([(
                    "GEM".to_string(),
                    Localization::new(
                        "Qualcosa è andato storto %s",
                        "Alcune cose sono andate storte %s",
                    ),
                )]),
            ),
        ]);
        I18n::new(&I18nConfig::with_localizations(["en", "it"], localizations)).unwrap()
    }

    #[test]
    fn test_translate_singular_and_plural() {
        let i18n = gem_i18n();
        assert_eq!(
            i18n.translate("en", false, "GEM", &["Marco".into()]),
            "Something went wrong Marco"
        );
        assert_eq!(
            i18n.translate("it", true, "GEM", &["Marco".into()]),
            "Alcune cose sono andate storte Marco"
        );
    }

    #[test]
    fn test_translate_missing_key_returns_key() {
        let i18n = gem_i18n();
        assert_eq!(i18n.t("en", "NOPE", &[]), "NOPE");
        assert_eq!(i18n.t("it", "ITEMS", &[3.into()]), "ITEMS");
    }

    #[test]
    fn test_translate_unknown_locale_uses_default_catalog() {
        let i18n = gem_i18n();
        assert_eq!(i18n.t("fr", "GEM", &["Marco".into()]), "Something went wrong Marco");
        assert_eq!(i18n.t("", "GEM", &["Marco".into()]), "Something went wrong Marco");
        assert_eq!(i18n.t("IT", "GEM", &["Marco".into()]), "Qualcosa è andato storto Marco");
    }

    #[test]
    fn test_macros() {
        let i18n = gem_i18n();
        assert_eq!(t!(i18n, "en", "ITEMS", 1), "1 item");
        assert_eq!(tp!(i18n, "en", "ITEMS", 3u8), "3 items");
        assert_eq!(t!(i18n, "en", "GEM"), "Something went wrong %s");
        assert_eq!(t!(i18n, "en", "GEM", "a", "b",), "Something went wrong a");
    }

    #[test]
    fn test_match_locale_then_translate() {
        let i18n = gem_i18n();
        let locale = i18n.match_locale("it-CH, en;q=0.5").code();
        assert_eq!(locale, "it");
        assert_eq!(
            i18n.tp(&locale, "GEM", &["Marco".into()]),
            "Alcune cose sono andate storte Marco"
        );
    }

    #[test]
    fn test_accessors() {
        let i18n = gem_i18n();
        assert_eq!(i18n.default_locale().code(), "en");
        assert_eq!(i18n.supported_locales().len(), 2);
        assert!(i18n.has_locale("it"));
        assert!(!i18n.has_locale("fr"));
    }

    #[test]
    fn test_missing_source() {
        let config = I18nConfig {
            locales: vec!["en".to_string()],
            ..I18nConfig::default()
        };
        assert!(matches!(I18n::new(&config), Err(I18nError::MissingSource)));
    }

    #[test]
    fn test_strict_locales() {
        let config = I18nConfig {
            strict_locales: true,
            localizations: Some(HashMap::new()),
            ..I18nConfig::default()
        };
        assert!(matches!(I18n::new(&config), Err(I18nError::NoLocales)));

        let config = I18nConfig {
            strict_locales: false,
            ..config
        };
        let i18n = I18n::new(&config).unwrap();
        assert_eq!(i18n.default_locale().code(), "en");
        assert_eq!(i18n.t("en", "GEM", &[]), "GEM");
    }

    #[test]
    fn test_from_bytes() {
        let blobs = HashMap::from([
            ("en", r#"{"HI": {"one": "Hello %s"}}"#),
            ("it", r#"{"HI": {"one": "Ciao %s"}}"#),
        ]);
        let i18n = I18n::from_bytes(&["en", "it"], Format::Json, &blobs).unwrap();
        assert_eq!(i18n.tp("it", "HI", &["Marco".into()]), "Ciao Marco");
    }

    #[test]
    fn test_i18n_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<I18n>();
    }
}
