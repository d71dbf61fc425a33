//! Strategies that pick a locale tag for a request.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::header::{ACCEPT_LANGUAGE, COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use polyglot_core::{parse_accept_language, preferred_language};

/// Picks the locale tag for a request.
///
/// Returning `None` lets the middleware fall back to the configured default.
#[async_trait]
pub trait LocaleSelector: Send + Sync + 'static {
    async fn select(&self, request: &Parts, default: &str) -> Option<String>;
}

/// Top ranked `Accept-Language` tag, region included (`fr-CH` stays `fr-CH`).
///
/// Returns `default` when the header is absent, empty or has no usable entry.
pub fn select_locale_by_request(headers: &HeaderMap, default: &str) -> String {
    let Some(header) = headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
    else {
        return default.to_string();
    };

    preferred_language(header).unwrap_or_else(|| default.to_string())
}

/// Header based selection, optionally negotiated against supported locales.
#[derive(Debug, Clone, Default)]
pub struct AcceptLanguage {
    supported: Option<Vec<String>>,
}

impl AcceptLanguage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only answer with one of `locales`.
    ///
    /// Each acceptable preference is matched by full tag first, then by its
    /// primary subtag (`zh-CN` matches a supported `zh`).
    pub fn supported<I, S>(locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            supported: Some(locales.into_iter().map(Into::into).collect()),
        }
    }

    fn negotiate(supported: &[String], headers: &HeaderMap) -> Option<String> {
        let header = headers.get(ACCEPT_LANGUAGE)?.to_str().ok()?;
        let find = |tag: &str| {
            supported
                .iter()
                .find(|s| s.eq_ignore_ascii_case(tag))
                .cloned()
        };

        parse_accept_language(header)
            .into_iter()
            .filter(|pref| pref.is_acceptable())
            .find_map(|pref| {
                find(&pref.tag).or_else(|| {
                    let primary = pref.tag.split(['-', '_']).next()?;
                    find(primary)
                })
            })
    }
}

#[async_trait]
impl LocaleSelector for AcceptLanguage {
    async fn select(&self, request: &Parts, default: &str) -> Option<String> {
        match &self.supported {
            None => Some(select_locale_by_request(&request.headers, default)),
            Some(supported) => Some(
                Self::negotiate(supported, &request.headers)
                    .unwrap_or_else(|| default.to_string()),
            ),
        }
    }
}

/// Value of a named cookie, e.g. `locale=fr-CH`.
#[derive(Debug, Clone)]
pub struct Cookie {
    name: String,
}

impl Cookie {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl LocaleSelector for Cookie {
    async fn select(&self, request: &Parts, _default: &str) -> Option<String> {
        request
            .headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .find_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                (name.trim() == self.name)
                    .then(|| value.trim().trim_matches('"').to_string())
                    .filter(|v| !v.is_empty())
            })
    }
}

/// First path segment when it names a supported locale: `/fr/about`.
#[derive(Debug, Clone)]
pub struct PathPrefix {
    supported: Vec<String>,
}

impl PathPrefix {
    pub fn new<I, S>(locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            supported: locales.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl LocaleSelector for PathPrefix {
    async fn select(&self, request: &Parts, _default: &str) -> Option<String> {
        let segment = request.uri.path().trim_start_matches('/').split('/').next()?;
        self.supported
            .iter()
            .find(|s| s.eq_ignore_ascii_case(segment))
            .cloned()
    }
}

/// Tries each strategy in order. The first `Some` wins.
#[derive(Clone, Default)]
pub struct Chain {
    selectors: Vec<Arc<dyn LocaleSelector>>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, selector: impl LocaleSelector) -> Self {
        self.selectors.push(Arc::new(selector));
        self
    }
}

#[async_trait]
impl LocaleSelector for Chain {
    async fn select(&self, request: &Parts, default: &str) -> Option<String> {
        for selector in &self.selectors {
            if let Some(tag) = selector.select(request, default).await {
                return Some(tag);
            }
        }
        None
    }
}

/// See [`selector_fn`].
#[derive(Clone)]
pub struct FnSelector<F>(F);

/// Wrap a synchronous closure as a [`LocaleSelector`].
pub fn selector_fn<F>(f: F) -> FnSelector<F>
where
    F: Fn(&Parts, &str) -> Option<String> + Send + Sync + 'static,
{
    FnSelector(f)
}

#[async_trait]
impl<F> LocaleSelector for FnSelector<F>
where
    F: Fn(&Parts, &str) -> Option<String> + Send + Sync + 'static,
{
    async fn select(&self, request: &Parts, default: &str) -> Option<String> {
        (self.0)(request, default)
    }
}
