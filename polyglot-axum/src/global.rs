//! Process wide [`Babel`] for code that has no handle to pass around.
//!
//! [`install`] exactly once at startup. Until then every lookup here fails
//! with [`polyglot_core::Error::NotInitialized`]. A second [`install`] does
//! not replace the first handle: it fails with
//! [`polyglot_core::Error::AlreadyInitialized`] and the first handle stays in
//! place. Build additional [`Babel`] instances freely, they just cannot
//! become the global one.
//!
//! The `d*` variants take a domain, `None` being the configured default.

use std::sync::{Arc, OnceLock};

use polyglot_core::{Catalog, Locale};

use crate::babel::{Babel, Result};

static BABEL: OnceLock<Babel> = OnceLock::new();

pub fn install(babel: Babel) -> Result<()> {
    BABEL
        .set(babel)
        .map_err(|_| polyglot_core::Error::AlreadyInitialized)?;
    log::info!("Global Babel installed");
    Ok(())
}

pub fn babel() -> Result<&'static Babel> {
    Ok(BABEL.get().ok_or(polyglot_core::Error::NotInitialized)?)
}

/// See [`Babel::translations`].
pub async fn get_translations(domain: Option<&str>, locale: Option<&Locale>) -> Result<Arc<Catalog>> {
    babel()?.translations(domain, locale).await
}

pub async fn gettext(message: &str, args: &[(&str, &str)]) -> Result<String> {
    babel()?.gettext(message, args).await
}

pub async fn dgettext(domain: Option<&str>, message: &str, args: &[(&str, &str)]) -> Result<String> {
    babel()?.dgettext(domain, message, args).await
}

pub async fn ngettext(singular: &str, plural: &str, n: u64, args: &[(&str, &str)]) -> Result<String> {
    babel()?.ngettext(singular, plural, n, args).await
}

pub async fn dngettext(
    domain: Option<&str>,
    singular: &str,
    plural: &str,
    n: u64,
    args: &[(&str, &str)],
) -> Result<String> {
    babel()?.dngettext(domain, singular, plural, n, args).await
}

pub async fn pgettext(context: &str, message: &str, args: &[(&str, &str)]) -> Result<String> {
    babel()?.pgettext(context, message, args).await
}

pub async fn dpgettext(
    domain: Option<&str>,
    context: &str,
    message: &str,
    args: &[(&str, &str)],
) -> Result<String> {
    babel()?.dpgettext(domain, context, message, args).await
}

pub async fn npgettext(
    context: &str,
    singular: &str,
    plural: &str,
    n: u64,
    args: &[(&str, &str)],
) -> Result<String> {
    babel()?.npgettext(context, singular, plural, n, args).await
}

pub async fn dnpgettext(
    domain: Option<&str>,
    context: &str,
    singular: &str,
    plural: &str,
    n: u64,
    args: &[(&str, &str)],
) -> Result<String> {
    babel()?
        .dnpgettext(domain, context, singular, plural, n, args)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    // Nothing in this test binary installs a global Babel.
    #[tokio::test]
    async fn test_not_initialized() {
        let err = gettext("Hello World!", &[]).await.unwrap_err();
        assert!(matches!(err.inner(), polyglot_core::Error::NotInitialized));
        let err = get_translations(None, None).await.unwrap_err();
        assert!(matches!(err.inner(), polyglot_core::Error::NotInitialized));
        assert!(ngettext("a", "b", 2, &[]).await.is_err());
        assert!(pgettext("c", "a", &[]).await.is_err());
        assert!(npgettext("c", "a", "b", 2, &[]).await.is_err());
        assert!(dgettext(Some("admin"), "a", &[]).await.is_err());
        assert!(dngettext(Some("admin"), "a", "b", 2, &[]).await.is_err());
        assert!(dpgettext(Some("admin"), "c", "a", &[]).await.is_err());
        assert!(dnpgettext(Some("admin"), "c", "a", "b", 2, &[]).await.is_err());
    }
}
