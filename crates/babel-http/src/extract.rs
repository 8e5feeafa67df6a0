//! Locale candidate extraction from HTTP requests.

use axum::http::{request::Parts, Extensions, HeaderMap, Request, Uri};
use axum_extra::extract::cookie::CookieJar;
use babel_i18n::{HttpLocalePosition, LocaleSource};

/// Borrowed view of the parts of a request that locale lookup reads.
#[derive(Debug, Clone, Copy)]
pub struct RequestView<'a> {
    headers: &'a HeaderMap,
    uri: &'a Uri,
    extensions: &'a Extensions,
}

impl<'a> RequestView<'a> {
    /// Borrow the parts of a request.
    pub fn new(headers: &'a HeaderMap, uri: &'a Uri, extensions: &'a Extensions) -> Self {
        Self {
            headers,
            uri,
            extensions,
        }
    }

    /// Request headers.
    pub fn headers(&self) -> &'a HeaderMap {
        self.headers
    }

    /// Request URI, including the query string.
    pub fn uri(&self) -> &'a Uri {
        self.uri
    }

    /// Request extensions, for overrides that read values set by other
    /// middleware (an authenticated user's preference, for instance).
    pub fn extensions(&self) -> &'a Extensions {
        self.extensions
    }

    /// First value of a header, if present and valid ASCII.
    pub fn header(&self, name: &str) -> Option<&'a str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Value of a cookie.
    pub fn cookie(&self, name: &str) -> Option<String> {
        CookieJar::from_headers(self.headers)
            .get(name)
            .map(|cookie| cookie.value().to_string())
    }

    /// First value of a query parameter, percent-decoded.
    pub fn query(&self, name: &str) -> Option<String> {
        let query = self.uri.query()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// Value at one strategy position.
    pub fn lookup(&self, position: &HttpLocalePosition) -> Option<String> {
        match position.source {
            LocaleSource::Header => self.header(&position.key).map(str::to_string),
            LocaleSource::Cookie => self.cookie(&position.key),
            LocaleSource::Query => self.query(&position.key),
        }
    }
}

impl<'a, B> From<&'a Request<B>> for RequestView<'a> {
    fn from(request: &'a Request<B>) -> Self {
        Self::new(request.headers(), request.uri(), request.extensions())
    }
}

impl<'a> From<&'a Parts> for RequestView<'a> {
    fn from(parts: &'a Parts) -> Self {
        Self::new(&parts.headers, &parts.uri, &parts.extensions)
    }
}

/// Application hook that picks a locale before the lookup strategy runs.
///
/// Returning `None` or an empty string defers to the strategy.
pub trait LocaleOverride: Send + Sync {
    fn locale(&self, request: &RequestView<'_>) -> Option<String>;
}

impl<F> LocaleOverride for F
where
    F: Fn(&RequestView<'_>) -> Option<String> + Send + Sync,
{
    fn locale(&self, request: &RequestView<'_>) -> Option<String> {
        self(request)
    }
}

/// Raw locale candidate for a request.
///
/// The override wins when it yields a non-empty value, then each strategy
/// position is tried in order and the first non-empty value is returned.
/// With no request, or nothing found, the result is empty.
pub fn extract_locale(
    request: Option<&RequestView<'_>>,
    locale_override: Option<&dyn LocaleOverride>,
    strategy: &[HttpLocalePosition],
) -> String {
    let Some(request) = request else {
        return String::new();
    };

    if let Some(locale) = locale_override
        .and_then(|o| o.locale(request))
        .filter(|l| !l.is_empty())
    {
        return locale;
    }

    strategy
        .iter()
        .filter_map(|position| request.lookup(position))
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use babel_i18n::default_lookup_strategy;
    use test_case::test_case;

    fn request(uri: &str, headers: &[(&str, &str)]) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn extract(req: &Request<Body>, strategy: &[HttpLocalePosition]) -> String {
        extract_locale(Some(&RequestView::from(req)), None, strategy)
    }

    #[test_case("/", &[("Accept-Language", "it-CH")], "it-CH" ; "header")]
    #[test_case("/", &[("cookie", "theme=dark; lang=it")], "it" ; "cookie")]
    #[test_case("/?lang=en-GB", &[], "en-GB" ; "query")]
    #[test_case("/?lang=", &[("Accept-Language", "")], "" ; "empty values")]
    #[test_case("/", &[], "" ; "nothing")]
    fn test_default_strategy(uri: &str, headers: &[(&str, &str)], expected: &str) {
        let req = request(uri, headers);
        assert_eq!(extract(&req, &default_lookup_strategy()), expected);
    }

    #[test]
    fn test_strategy_order_is_respected() {
        let req = request(
            "/?lang=fr",
            &[("Accept-Language", "en"), ("cookie", "lang=it")],
        );
        let strategy = vec![
            HttpLocalePosition::cookie("lang"),
            HttpLocalePosition::header("Accept-Language"),
        ];
        assert_eq!(extract(&req, &strategy), "it");
        assert_eq!(extract(&req, &default_lookup_strategy()), "en");
    }

    #[test]
    fn test_empty_value_falls_through() {
        let req = request("/?lang=it", &[("Accept-Language", "")]);
        assert_eq!(extract(&req, &default_lookup_strategy()), "it");
    }

    #[test]
    fn test_query_is_percent_decoded() {
        let req = request("/?page=2&locale=pt%2DBR", &[]);
        let strategy = vec![HttpLocalePosition::query("locale")];
        assert_eq!(extract(&req, &strategy), "pt-BR");
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let req = request("/", &[("accept-language", "it")]);
        let view = RequestView::from(&req);
        assert_eq!(view.header("Accept-Language"), Some("it"));
    }

    #[test]
    fn test_invalid_header_name_is_ignored() {
        let req = request("/", &[]);
        let strategy = vec![HttpLocalePosition::header("bad header")];
        assert_eq!(extract(&req, &strategy), "");
    }

    #[test]
    fn test_override_wins() {
        let req = request("/", &[("Accept-Language", "en")]);
        let view = RequestView::from(&req);
        let force_it = |_: &RequestView<'_>| Some("it".to_string());
        assert_eq!(
            extract_locale(Some(&view), Some(&force_it), &default_lookup_strategy()),
            "it"
        );
    }

    #[test]
    fn test_empty_override_defers_to_strategy() {
        let req = request("/", &[("Accept-Language", "en")]);
        let view = RequestView::from(&req);
        let empty = |_: &RequestView<'_>| Some(String::new());
        let none = |_: &RequestView<'_>| -> Option<String> { None };
        let strategy = default_lookup_strategy();
        assert_eq!(extract_locale(Some(&view), Some(&empty), &strategy), "en");
        assert_eq!(extract_locale(Some(&view), Some(&none), &strategy), "en");
    }

    #[test]
    fn test_override_reads_extensions() {
        #[derive(Clone)]
        struct UserLanguage(&'static str);

        let mut req = request("/", &[("Accept-Language", "en")]);
        req.extensions_mut().insert(UserLanguage("it"));
        let from_user = |view: &RequestView<'_>| {
            view.extensions()
                .get::<UserLanguage>()
                .map(|u| u.0.to_string())
        };

        let view = RequestView::from(&req);
        assert_eq!(
            extract_locale(Some(&view), Some(&from_user), &default_lookup_strategy()),
            "it"
        );
    }

    #[test]
    fn test_missing_request() {
        let force_it = |_: &RequestView<'_>| Some("it".to_string());
        assert_eq!(
            extract_locale(None, Some(&force_it), &default_lookup_strategy()),
            ""
        );
    }

    #[test]
    fn test_view_from_parts() {
        let (parts, _body) = request("/?lang=it", &[]).into_parts();
        let view = RequestView::from(&parts);
        assert_eq!(view.query("lang").as_deref(), Some("it"));
        assert_eq!(view.uri().path(), "/");
    }
}
