//! The locale of the request being handled.
//!
//! Set by the middleware for the duration of the downstream call. Each request
//! future gets its own scope, so concurrent requests never see each other's
//! locale. Tasks spawned from a handler do not inherit the scope; wrap them
//! with [`with_locale`] if they translate.

use std::future::Future;

use polyglot_core::Locale;
use tokio::task_local;

task_local! {
    static CURRENT_LOCALE: Locale;
}

/// `None` outside a request scope.
pub fn current_locale() -> Option<Locale> {
    CURRENT_LOCALE.try_with(|locale| locale.clone()).ok()
}

pub async fn with_locale<F: Future>(locale: Locale, f: F) -> F::Output {
    CURRENT_LOCALE.scope(locale, f).await
}

pub fn sync_with_locale<R>(locale: Locale, f: impl FnOnce() -> R) -> R {
    CURRENT_LOCALE.sync_scope(locale, f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_unset_outside_scope() {
        assert_eq!(current_locale(), None);
    }

    #[tokio::test]
    async fn test_scope_is_bounded() {
        let fr = Locale::parse("fr-CH").unwrap();
        let seen = with_locale(fr.clone(), async { current_locale() }).await;
        assert_eq!(seen, Some(fr));
        assert_eq!(current_locale(), None);
    }

    #[tokio::test]
    async fn test_nested_scope_restores_outer() {
        let en = Locale::parse("en").unwrap();
        let de = Locale::parse("de").unwrap();
        with_locale(en.clone(), async {
            let inner = with_locale(de.clone(), async { current_locale() }).await;
            assert_eq!(inner, Some(de.clone()));
            assert_eq!(current_locale(), Some(en.clone()));
        })
        .await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_scopes_are_isolated() {
        let run = |tag: &'static str| {
            let locale = Locale::parse(tag).unwrap();
            tokio::spawn(with_locale(locale, async move {
                for _ in 0..5 {
                    assert_eq!(current_locale().map(|l| l.tag()).as_deref(), Some(tag));
                    tokio::time::sleep(Duration::from_millis(2)).await;
                }
            }))
        };

        let (a, b) = tokio::join!(run("en"), run("fr-CH"));
        a.unwrap();
        b.unwrap();
    }

    #[test]
    fn test_sync_scope() {
        let locale = Locale::parse("ja").unwrap();
        let tag = sync_with_locale(locale, || current_locale().map(|l| l.tag()));
        assert_eq!(tag.as_deref(), Some("ja"));
        assert_eq!(current_locale(), None);
    }
}
