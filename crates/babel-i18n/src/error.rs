//! Error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// Setup errors.
///
/// Only construction can fail. Resolution and translation always produce
/// a value and never surface one of these.
#[derive(Debug, Error)]
pub enum I18nError {
    #[error("no supported locales configured")]
    NoLocales,

    #[error("invalid locale identifier {locale:?}: {message}")]
    InvalidLocale { locale: String, message: String },

    #[error("neither a localizations path nor in-memory localizations were provided")]
    MissingSource,

    #[error("no localization file found for locale {locale:?} in {}", .dir.display())]
    MissingFile { locale: String, dir: PathBuf },

    #[error("unsupported localization format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to decode {origin} as {format}: {message}")]
    Decode {
        origin: String,
        format: &'static str,
        message: String,
    },

    #[error("failed to read localizations: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Reasons an Accept-Language style value is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcceptLanguageError {
    #[error("invalid language tag {0:?}")]
    InvalidTag(String),

    #[error("invalid weight {0:?}")]
    InvalidWeight(String),
}
