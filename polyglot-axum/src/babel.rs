use std::fmt;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use polyglot_core::{
    BabelConfig, Catalog, CatalogProvider, Locale, TomlCatalogProvider, TranslationCache,
    substitute,
};

use crate::context::current_locale;
use crate::err::Error;
use crate::selector::{AcceptLanguage, LocaleSelector};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Translation service: configuration, locale selection and the catalog cache.
///
/// Cheap to clone. Every clone shares one cache, so build it once at startup
/// and hand clones to the middleware and to whatever needs translations.
#[derive(Clone)]
pub struct Babel {
    inner: Arc<Inner>,
}

struct Inner {
    config: BabelConfig,
    cache: TranslationCache,
    selector: Arc<dyn LocaleSelector>,
}

pub struct BabelBuilder {
    config: BabelConfig,
    provider: Arc<dyn CatalogProvider>,
    selector: Arc<dyn LocaleSelector>,
}

impl BabelBuilder {
    /// Defaults to [`TomlCatalogProvider`].
    pub fn provider(mut self, provider: impl CatalogProvider) -> Self {
        self.provider = Arc::new(provider);
        self
    }

    /// Defaults to [`AcceptLanguage`].
    pub fn selector(mut self, selector: impl LocaleSelector) -> Self {
        self.selector = Arc::new(selector);
        self
    }

    pub fn build(self) -> Babel {
        tracing::info!(
            "Babel ready: default_locale={}, domain={}, locales_dirs={:?}",
            self.config.default_locale,
            self.config.domain,
            self.config.locales_dirs
        );
        let cache = TranslationCache::new(self.provider, self.config.locales_dirs.clone());
        Babel {
            inner: Arc::new(Inner {
                config: self.config,
                cache,
                selector: self.selector,
            }),
        }
    }
}

impl Babel {
    pub fn new(config: BabelConfig) -> Self {
        Self::builder(config).build()
    }

    pub fn builder(config: BabelConfig) -> BabelBuilder {
        BabelBuilder {
            config,
            provider: Arc::new(TomlCatalogProvider),
            selector: Arc::new(AcceptLanguage::new()),
        }
    }

    pub fn config(&self) -> &BabelConfig {
        &self.inner.config
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.inner.cache
    }

    /// Run the selector, fall back to the default locale and parse the tag.
    ///
    /// A tag that does not parse is an error, it is not replaced by the
    /// default.
    pub async fn resolve_locale(&self, request: &Parts) -> Result<Locale> {
        let default = &self.inner.config.default_locale;
        let tag = self
            .inner
            .selector
            .select(request, default)
            .await
            .filter(|tag| !tag.trim().is_empty())
            .unwrap_or_else(|| default.clone());
        Ok(Locale::parse(&tag)?)
    }

    /// Catalog for `domain` (default domain when `None`) and `locale`
    /// (current request locale when `None`).
    ///
    /// Outside a request, with no explicit locale, this is the null catalog.
    pub async fn translations(
        &self,
        domain: Option<&str>,
        locale: Option<&Locale>,
    ) -> Result<Arc<Catalog>> {
        let locale = locale.cloned().or_else(current_locale);
        self.catalog(domain, locale.as_ref()).await
    }

    async fn catalog(&self, domain: Option<&str>, locale: Option<&Locale>) -> Result<Arc<Catalog>> {
        let Some(locale) = locale else {
            return Ok(Catalog::null());
        };
        let domain = domain.unwrap_or(&self.inner.config.domain);
        Ok(self.inner.cache.lookup(domain, locale).await?)
    }

    /// Translator bound to `locale`. `None` translates nothing.
    pub fn translator(&self, locale: Option<Locale>) -> Translator {
        Translator {
            babel: self.clone(),
            locale,
        }
    }

    /// Translator bound to the current request locale.
    pub fn current(&self) -> Translator {
        self.translator(current_locale())
    }

    pub async fn gettext(&self, message: &str, args: &[(&str, &str)]) -> Result<String> {
        self.current().gettext(message, args).await
    }

    /// `domain` of `None` is the configured default domain.
    pub async fn dgettext(
        &self,
        domain: Option<&str>,
        message: &str,
        args: &[(&str, &str)],
    ) -> Result<String> {
        self.current().dgettext(domain, message, args).await
    }

    pub async fn ngettext(
        &self,
        singular: &str,
        plural: &str,
        n: u64,
        args: &[(&str, &str)],
    ) -> Result<String> {
        self.current().ngettext(singular, plural, n, args).await
    }

    pub async fn dngettext(
        &self,
        domain: Option<&str>,
        singular: &str,
        plural: &str,
        n: u64,
        args: &[(&str, &str)],
    ) -> Result<String> {
        self.current()
            .dngettext(domain, singular, plural, n, args)
            .await
    }

    pub async fn pgettext(&self, context: &str, message: &str, args: &[(&str, &str)]) -> Result<String> {
        self.current().pgettext(context, message, args).await
    }

    pub async fn dpgettext(
        &self,
        domain: Option<&str>,
        context: &str,
        message: &str,
        args: &[(&str, &str)],
    ) -> Result<String> {
        self.current().dpgettext(domain, context, message, args).await
    }

    pub async fn npgettext(
        &self,
        context: &str,
        singular: &str,
        plural: &str,
        n: u64,
        args: &[(&str, &str)],
    ) -> Result<String> {
        self.current().npgettext(context, singular, plural, n, args).await
    }

    pub async fn dnpgettext(
        &self,
        domain: Option<&str>,
        context: &str,
        singular: &str,
        plural: &str,
        n: u64,
        args: &[(&str, &str)],
    ) -> Result<String> {
        self.current()
            .dnpgettext(domain, context, singular, plural, n, args)
            .await
    }
}

impl fmt::Debug for Babel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Babel")
            .field("config", &self.inner.config)
            .field("cached", &self.inner.cache.len())
            .finish()
    }
}

/// `args` plus `num = n`, unless the caller passed `num` already.
fn with_num<'a>(args: &[(&'a str, &'a str)], num: &'a str) -> Vec<(&'a str, &'a str)> {
    let mut all = args.to_vec();
    if !all.iter().any(|(k, _)| *k == "num") {
        all.push(("num", num));
    }
    all
}

/// gettext-style lookups for one locale.
///
/// Handlers behind the middleware can take it as an extractor:
///
/// ```ignore
/// async fn hello(t: Translator) -> Result<String, Error> {
///     t.gettext("Hello World!", &[]).await
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Translator {
    babel: Babel,
    locale: Option<Locale>,
}

impl Translator {
    pub fn locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }

    pub async fn catalog(&self, domain: Option<&str>) -> Result<Arc<Catalog>> {
        self.babel.catalog(domain, self.locale.as_ref()).await
    }

    pub async fn gettext(&self, message: &str, args: &[(&str, &str)]) -> Result<String> {
        self.dgettext(None, message, args).await
    }

    pub async fn dgettext(
        &self,
        domain: Option<&str>,
        message: &str,
        args: &[(&str, &str)],
    ) -> Result<String> {
        let catalog = self.catalog(domain).await?;
        Ok(substitute(catalog.gettext(message), args))
    }

    pub async fn ngettext(
        &self,
        singular: &str,
        plural: &str,
        n: u64,
        args: &[(&str, &str)],
    ) -> Result<String> {
        self.dngettext(None, singular, plural, n, args).await
    }

    pub async fn dngettext(
        &self,
        domain: Option<&str>,
        singular: &str,
        plural: &str,
        n: u64,
        args: &[(&str, &str)],
    ) -> Result<String> {
        let catalog = self.catalog(domain).await?;
        let num = n.to_string();
        Ok(substitute(
            catalog.ngettext(singular, plural, n),
            &with_num(args, &num),
        ))
    }

    pub async fn pgettext(&self, context: &str, message: &str, args: &[(&str, &str)]) -> Result<String> {
        self.dpgettext(None, context, message, args).await
    }

    pub async fn dpgettext(
        &self,
        domain: Option<&str>,
        context: &str,
        message: &str,
        args: &[(&str, &str)],
    ) -> Result<String> {
        let catalog = self.catalog(domain).await?;
        Ok(substitute(catalog.pgettext(context, message), args))
    }

    pub async fn npgettext(
        &self,
        context: &str,
        singular: &str,
        plural: &str,
        n: u64,
        args: &[(&str, &str)],
    ) -> Result<String> {
        self.dnpgettext(None, context, singular, plural, n, args).await
    }

    pub async fn dnpgettext(
        &self,
        domain: Option<&str>,
        context: &str,
        singular: &str,
        plural: &str,
        n: u64,
        args: &[(&str, &str)],
    ) -> Result<String> {
        let catalog = self.catalog(domain).await?;
        let num = n.to_string();
        Ok(substitute(
            catalog.npgettext(context, singular, plural, n),
            &with_num(args, &num),
        ))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Translator {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let babel = parts
            .extensions
            .get::<Babel>()
            .cloned()
            .ok_or(polyglot_core::Error::NotInitialized)?;
        let locale = parts.extensions.get::<Locale>().cloned();
        Ok(babel.translator(locale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::with_locale;
    use crate::selector::{Cookie, selector_fn};
    use polyglot_core::{PluralForm, async_trait};
    use std::path::Path;

    struct FrenchProvider;

    #[async_trait]
    impl CatalogProvider for FrenchProvider {
        async fn load(
            &self,
            _dir: &Path,
            locale: &Locale,
            domain: &str,
        ) -> polyglot_core::Result<Catalog> {
            let mut catalog = Catalog::new(locale);
            if locale.language() != "fr" {
                return Ok(catalog);
            }
            if domain == "admin" {
                catalog.insert("Hello World!", "Bienvenue, admin");
                return Ok(catalog);
            }
            catalog.insert("Hello World!", "Bonjour le monde!");
            catalog.insert("Hello %(name)s", "Bonjour %(name)s");
            catalog.insert_with_context("month", "May", "Mai");
            let forms = [
                (PluralForm::One, "%(num)d article".to_string()),
                (PluralForm::Other, "%(num)d articles".to_string()),
            ];
            catalog.insert_plural("%(num)d item", forms.iter().cloned().collect());
            let forms = [
                (PluralForm::One, "%(num)d produit de %(who)s".to_string()),
                (PluralForm::Other, "%(num)d produits de %(who)s".to_string()),
            ];
            catalog.insert_plural_with_context("cart", "%(num)d item", forms.iter().cloned().collect());
            Ok(catalog)
        }
    }

    fn babel() -> Babel {
        Babel::builder(BabelConfig::default()).provider(FrenchProvider).build()
    }

    #[tokio::test]
    async fn test_outside_request_passes_through() {
        let babel = babel();
        assert_eq!(babel.gettext("Hello World!", &[]).await.unwrap(), "Hello World!");
        assert_eq!(
            babel.ngettext("%(num)d item", "%(num)d items", 1, &[]).await.unwrap(),
            "1 item"
        );
        assert_eq!(
            babel.ngettext("%(num)d item", "%(num)d items", 4, &[]).await.unwrap(),
            "4 items"
        );
        let catalog = babel.translations(None, None).await.unwrap();
        assert!(Arc::ptr_eq(&catalog, &Catalog::null()));
        assert!(babel.cache().is_empty());
    }

    #[tokio::test]
    async fn test_ambient_locale() {
        let babel = babel();
        let fr = Locale::parse("fr-CH").unwrap();
        with_locale(fr, async {
            assert_eq!(babel.gettext("Hello World!", &[]).await.unwrap(), "Bonjour le monde!");
            assert_eq!(
                babel.gettext("Hello %(name)s", &[("name", "Ana")]).await.unwrap(),
                "Bonjour Ana"
            );
            assert_eq!(babel.gettext("Untranslated", &[]).await.unwrap(), "Untranslated");
            assert_eq!(babel.pgettext("month", "May", &[]).await.unwrap(), "Mai");
            assert_eq!(
                babel.ngettext("%(num)d item", "%(num)d items", 1, &[]).await.unwrap(),
                "1 article"
            );
            assert_eq!(
                babel.ngettext("%(num)d item", "%(num)d items", 5, &[]).await.unwrap(),
                "5 articles"
            );
            assert_eq!(
                babel
                    .npgettext("cart", "%(num)d item", "%(num)d items", 2, &[("who", "Ana")])
                    .await
                    .unwrap(),
                "2 produits de Ana"
            );
        })
        .await;
        assert_eq!(babel.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_explicit_num_is_kept() {
        let t = babel().translator(Some(Locale::parse("fr").unwrap()));
        assert_eq!(
            t.ngettext("%(num)d item", "%(num)d items", 3, &[("num", "three")]).await.unwrap(),
            "three articles"
        );
    }

    #[tokio::test]
    async fn test_explicit_locale_and_domain() {
        let babel = babel();
        let fr = Locale::parse("fr").unwrap();
        let catalog = babel.translations(Some("admin"), Some(&fr)).await.unwrap();
        assert_eq!(catalog.gettext("Hello World!"), "Bienvenue, admin");

        let t = babel.translator(Some(fr));
        assert_eq!(t.dgettext(Some("admin"), "Hello World!", &[]).await.unwrap(), "Bienvenue, admin");
        assert_eq!(t.gettext("Hello World!", &[]).await.unwrap(), "Bonjour le monde!");

        let none = babel.translator(None);
        assert_eq!(none.gettext("Hello World!", &[]).await.unwrap(), "Hello World!");
    }

    #[tokio::test]
    async fn test_resolve_locale() {
        let babel = Babel::builder(BabelConfig::new().default_locale("de"))
            .provider(FrenchProvider)
            .build();

        let req = axum::http::Request::builder()
            .header("accept-language", "fr-CH, fr;q=0.9")
            .body(())
            .unwrap();
        let locale = babel.resolve_locale(&req.into_parts().0).await.unwrap();
        assert_eq!(locale.to_string(), "fr_CH");

        let req = axum::http::Request::builder().body(()).unwrap();
        let locale = babel.resolve_locale(&req.into_parts().0).await.unwrap();
        assert_eq!(locale.tag(), "de");

        let req = axum::http::Request::builder()
            .header("accept-language", "!!bogus")
            .body(())
            .unwrap();
        let err = babel.resolve_locale(&req.into_parts().0).await.unwrap_err();
        assert!(matches!(err.inner(), polyglot_core::Error::LocaleParse { .. }));
    }

    #[tokio::test]
    async fn test_resolve_locale_falls_back_to_default() {
        let config = BabelConfig::new().default_locale("pt-BR");
        let req = axum::http::Request::builder()
            .header("accept-language", "fr")
            .body(())
            .unwrap();
        let parts = req.into_parts().0;

        let by_cookie = Babel::builder(config.clone())
            .provider(FrenchProvider)
            .selector(Cookie::new("locale"))
            .build();
        let locale = by_cookie.resolve_locale(&parts).await.unwrap();
        assert_eq!(locale.tag(), "pt-BR");

        let blank = Babel::builder(config.clone())
            .provider(FrenchProvider)
            .selector(selector_fn(|_: &Parts, _: &str| Some(String::new())))
            .build();
        let locale = blank.resolve_locale(&parts).await.unwrap();
        assert_eq!(locale.tag(), "pt-BR");

        let spaces = Babel::builder(config)
            .provider(FrenchProvider)
            .selector(selector_fn(|_: &Parts, _: &str| Some("  ".to_string())))
            .build();
        let locale = spaces.resolve_locale(&parts).await.unwrap();
        assert_eq!(locale.to_string(), "pt_BR");
    }
}
