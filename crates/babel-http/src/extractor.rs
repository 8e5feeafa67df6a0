//! Axum extractors for the locale stored by [`LocaleLayer`](crate::LocaleLayer).

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use babel_i18n::{Arg, Locale};

use crate::localizer::HttpLocalizer;

const MISSING_LAYER: &str = "locale middleware not installed";

/// The locale resolved for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLocale(pub Locale);

impl RequestLocale {
    /// The resolved locale.
    pub fn locale(&self) -> &Locale {
        &self.0
    }

    /// Canonical code of the resolved locale.
    pub fn code(&self) -> String {
        self.0.code()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestLocale
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestLocale>()
            .cloned()
            .ok_or((StatusCode::INTERNAL_SERVER_ERROR, MISSING_LAYER))
    }
}

/// Translations bound to the current request's locale.
///
/// ```ignore
/// async fn handler(tr: Translator) -> String {
///     tr.t("GEM", &["Marco".into()])
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Translator {
    localizer: HttpLocalizer,
    locale: String,
}

impl Translator {
    /// Canonical code of the request's locale.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Singular translation.
    pub fn t(&self, key: &str, args: &[Arg]) -> String {
        self.localizer.i18n().t(&self.locale, key, args)
    }

    /// Plural translation.
    pub fn tp(&self, key: &str, args: &[Arg]) -> String {
        self.localizer.i18n().tp(&self.locale, key, args)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Translator
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let localizer = parts
            .extensions
            .get::<HttpLocalizer>()
            .cloned()
            .ok_or((StatusCode::INTERNAL_SERVER_ERROR, MISSING_LAYER))?;
        let locale = RequestLocale::from_request_parts(parts, state).await?;

        Ok(Self {
            localizer,
            locale: locale.code(),
        })
    }
}
