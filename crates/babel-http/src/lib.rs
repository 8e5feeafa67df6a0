//! HTTP integration for Babel.
//!
//! Finds the caller's locale in a request (override hook, then headers,
//! cookies and query parameters in a configurable order), resolves it
//! against the supported locales and translates messages with it.
//!
//! ```ignore
//! let localizer = HttpLocalizer::from_config(&config)?;
//! let app = Router::new()
//!     .route("/", get(|tr: Translator| async move { tr.t("GEM", &["Marco".into()]) }))
//!     .layer(LocaleLayer::new(localizer));
//! ```

pub mod extract;
pub mod extractor;
pub mod localizer;
pub mod middleware;

pub use extract::{extract_locale, LocaleOverride, RequestView};
pub use extractor::{RequestLocale, Translator};
pub use localizer::HttpLocalizer;
pub use middleware::{LocaleLayer, LocaleMiddleware};
