//! Request-scoped locale resolution and translation.

use std::fmt;
use std::sync::Arc;

use babel_i18n::{
    default_lookup_strategy, Arg, HttpLocalePosition, I18n, I18nConfig, I18nError, Locale,
};
use tracing::trace;

use crate::extract::{extract_locale, LocaleOverride, RequestView};

/// Binds an [`I18n`] to a lookup strategy and an optional override.
///
/// Cloning is cheap; every clone shares the same translations.
#[derive(Clone)]
pub struct HttpLocalizer {
    i18n: Arc<I18n>,
    strategy: Arc<[HttpLocalePosition]>,
    locale_override: Option<Arc<dyn LocaleOverride>>,
}

impl HttpLocalizer {
    /// Localizer using the default lookup strategy and no override.
    pub fn new(i18n: Arc<I18n>) -> Self {
        Self {
            i18n,
            strategy: default_lookup_strategy().into(),
            locale_override: None,
        }
    }

    /// Build the translations and take the lookup strategy from `config`.
    pub fn from_config(config: &I18nConfig) -> Result<Self, I18nError> {
        let i18n = I18n::new(config)?;
        Ok(Self::new(Arc::new(i18n)).with_strategy(config.http_lookup_strategy.clone()))
    }

    /// Replace the lookup strategy.
    pub fn with_strategy(mut self, strategy: impl Into<Vec<HttpLocalePosition>>) -> Self {
        let strategy: Vec<HttpLocalePosition> = strategy.into();
        self.strategy = strategy.into();
        self
    }

    /// Consult `locale_override` before the lookup strategy.
    pub fn with_override(mut self, locale_override: impl LocaleOverride + 'static) -> Self {
        self.locale_override = Some(Arc::new(locale_override));
        self
    }

    /// Shared translations.
    pub fn i18n(&self) -> &Arc<I18n> {
        &self.i18n
    }

    /// Lookup strategy in the order it is tried.
    pub fn strategy(&self) -> &[HttpLocalePosition] {
        &self.strategy
    }

    /// Raw locale candidate found in the request.
    pub fn extract(&self, request: Option<&RequestView<'_>>) -> String {
        extract_locale(request, self.locale_override.as_deref(), &self.strategy)
    }

    /// Supported locale for the request; the default when there is no
    /// request or nothing usable in it.
    pub fn locale(&self, request: Option<&RequestView<'_>>) -> &Locale {
        let candidate = self.extract(request);
        let locale = self.i18n.match_locale(&candidate);
        trace!(candidate = %candidate, locale = %locale, "resolved request locale");
        locale
    }

    /// Singular translation in the request's locale.
    pub fn t(&self, request: Option<&RequestView<'_>>, key: &str, args: &[Arg]) -> String {
        self.translate(request, false, key, args)
    }

    /// Plural translation in the request's locale.
    pub fn tp(&self, request: Option<&RequestView<'_>>, key: &str, args: &[Arg]) -> String {
        self.translate(request, true, key, args)
    }

    fn translate(
        &self,
        request: Option<&RequestView<'_>>,
        plural: bool,
        key: &str,
        args: &[Arg],
    ) -> String {
        let locale = self.locale(request).code();
        self.i18n.translate(&locale, plural, key, args)
    }
}

impl fmt::Debug for HttpLocalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpLocalizer")
            .field("i18n", &self.i18n)
            .field("strategy", &self.strategy)
            .field("locale_override", &self.locale_override.is_some())
            .finish()
    }
}
