//! Per-request locale resolution middleware.

use std::task::{Context, Poll};

use axum::http::Request;
use futures::future::BoxFuture;
use tower::{Layer, Service};
use tracing::debug;

use crate::extract::RequestView;
use crate::extractor::RequestLocale;
use crate::localizer::HttpLocalizer;

/// Resolves the locale once per request and stores it as a
/// [`RequestLocale`] extension, together with the [`HttpLocalizer`] itself.
#[derive(Clone, Debug)]
pub struct LocaleLayer {
    localizer: HttpLocalizer,
}

impl LocaleLayer {
    /// Layer resolving locales with `localizer`.
    pub fn new(localizer: HttpLocalizer) -> Self {
        Self { localizer }
    }
}

impl<S> Layer<S> for LocaleLayer {
    type Service = LocaleMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LocaleMiddleware {
            inner,
            localizer: self.localizer.clone(),
        }
    }
}

/// Service produced by [`LocaleLayer`].
#[derive(Clone, Debug)]
pub struct LocaleMiddleware<S> {
    inner: S,
    localizer: HttpLocalizer,
}

impl<S, B> Service<Request<B>> for LocaleMiddleware<S>
where
    S: Service<Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        let locale = self.localizer.locale(Some(&RequestView::from(&req))).clone();
        debug!(locale = %locale, path = %req.uri().path(), "request locale");

        req.extensions_mut().insert(RequestLocale(locale));
        req.extensions_mut().insert(self.localizer.clone());

        // The clone may not be ready; keep the service that was polled.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move { inner.call(req).await })
    }
}
