use axum::Router;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use polyglot_axum::{
    AcceptLanguage, Babel, BabelConfig, Chain, Cookie, Error, Translator, WebServer,
    current_locale, global, with_locale,
};
use polyglot_logger::LoggerConfig;
use serde::Deserialize;

const DEFAULT_CONFIG: &str = "hello.yaml";

#[derive(Debug, Deserialize)]
struct AppConfig {
    #[serde(default = "default_addr")]
    addr: String,
    #[serde(default)]
    babel: BabelConfig,
    #[serde(default)]
    logger: LoggerConfig,
}

fn default_addr() -> String {
    "127.0.0.1:3000".to_string()
}

async fn hello(t: Translator) -> Result<String, Error> {
    t.gettext("Hello World!", &[]).await
}

async fn greet(t: Translator, Path(name): Path<String>) -> Result<String, Error> {
    t.gettext("Hello %(name)s!", &[("name", &name)]).await
}

async fn apples(t: Translator, Path(n): Path<u64>) -> Result<String, Error> {
    t.ngettext("%(num)d apple", "%(num)d apples", n, &[]).await
}

async fn locale() -> String {
    current_locale()
        .map(|l| l.to_string())
        .unwrap_or_default()
}

// Spawned tasks start outside the request scope and have to re-enter it.
async fn report() -> Response {
    let locale = current_locale();
    let task = tokio::spawn(async move {
        let text = global::gettext("Report ready", &[]);
        match locale {
            Some(locale) => with_locale(locale, text).await,
            None => text.await,
        }
    });

    match task.await {
        Ok(Ok(text)) => text.into_response(),
        Ok(Err(e)) => e.into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config: AppConfig = polyglot_core::yaml::load_from_file(&path)?;
    let _guard = config.logger.init();
    tracing::info!("Loaded config from {}", path);

    let babel = Babel::builder(config.babel)
        .selector(Chain::new().then(Cookie::new("locale")).then(AcceptLanguage::new()))
        .build();
    global::install(babel.clone())?;

    let routes = Router::new()
        .route("/", get(hello))
        .route("/greet/{name}", get(greet))
        .route("/apples/{n}", get(apples))
        .route("/locale", get(locale))
        .route("/report", get(report));

    WebServer::new(config.addr)
        .layer_babel(babel)
        .mount(routes)
        .start()
        .await
}
