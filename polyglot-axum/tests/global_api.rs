use axum::body::Body;
use axum::http::Request;
use axum::routing::get;
use axum::Router;
use polyglot_axum::{Babel, BabelConfig, Error, Locale, WebServer, global};
use tower::util::ServiceExt;

const LOCALES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/locales");

async fn hello() -> Result<String, Error> {
    let hello = global::gettext("Hello World!", &[]).await?;
    let apples = global::ngettext("%(num)d apple", "%(num)d apples", 2, &[]).await?;
    let month = global::pgettext("month", "May", &[]).await?;
    let inbox = global::npgettext("inbox", "%(num)d message", "%(num)d messages", 1, &[]).await?;
    Ok(format!("{hello}|{apples}|{month}|{inbox}"))
}

async fn admin() -> Result<String, Error> {
    let admin = Some("admin");
    let hello = global::dgettext(admin, "Hello World!", &[]).await?;
    let users = global::dngettext(admin, "%(num)d user", "%(num)d users", 3, &[]).await?;
    let save = global::dpgettext(admin, "button", "Save", &[]).await?;
    let changes = global::dnpgettext(admin, "audit", "%(num)d change", "%(num)d changes", 1, &[]).await?;
    let default = global::dgettext(None, "Hello World!", &[]).await?;
    Ok(format!("{hello}|{users}|{save}|{changes}|{default}"))
}

// One test per binary: the global handle can only be installed once.
#[tokio::test]
async fn test_global_api() {
    let err = global::gettext("Hello World!", &[]).await.unwrap_err();
    assert!(matches!(err.inner(), polyglot_core::Error::NotInitialized));

    let babel = Babel::new(BabelConfig::new().locales_dirs([LOCALES]));
    global::install(babel.clone()).unwrap();

    let err = global::install(babel.clone()).unwrap_err();
    assert!(matches!(err.inner(), polyglot_core::Error::AlreadyInitialized));

    // Installed but outside a request: nothing is translated.
    assert_eq!(global::gettext("Hello World!", &[]).await.unwrap(), "Hello World!");
    let catalog = global::get_translations(None, None).await.unwrap();
    assert!(catalog.is_empty());

    let fr = Locale::parse("fr").unwrap();
    let catalog = global::get_translations(Some("admin"), Some(&fr)).await.unwrap();
    assert_eq!(catalog.gettext("Hello World!"), "Bienvenue dans l'administration");
    let catalog = global::get_translations(None, Some(&fr)).await.unwrap();
    assert_eq!(catalog.gettext("Hello World!"), "Bonjour le monde!");

    let app: Router = WebServer::new("0.0.0.0:0")
        .mount(Router::new().route("/", get(hello)).route("/admin", get(admin)))
        .layer_babel(babel)
        .into_router();

    let req = Request::builder()
        .uri("/")
        .header("accept-language", "fr")
        .body(Body::empty())
        .unwrap();
    assert_eq!(
        body(&app, req).await,
        "Bonjour le monde!|2 pommes|Mai|1 message reçu"
    );

    let req = Request::builder()
        .uri("/admin")
        .header("accept-language", "fr-CH")
        .body(Body::empty())
        .unwrap();
    assert_eq!(
        body(&app, req).await,
        "Bienvenue dans l'administration|3 utilisateurs|Enregistrer|1 modification|Bonjour le monde!"
    );

    let req = Request::builder().uri("/admin").body(Body::empty()).unwrap();
    assert_eq!(
        body(&app, req).await,
        "Hello World!|3 users|Save|1 change|Hello World!"
    );
}

async fn body(app: &Router, req: Request<Body>) -> String {
    let response = app.clone().oneshot(req).await.unwrap();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}
