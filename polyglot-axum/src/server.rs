use std::future::Future;

use axum::extract::Request;
use axum::middleware::{Next, from_fn, from_fn_with_state};
use axum::response::Response;
use axum::Router;
use tokio::signal;

use crate::babel::Babel;
use crate::middleware::handle_babel;

pub struct WebServer {
    router: Router,
    addr: String,
    middlewares: Vec<Box<dyn FnOnce(Router) -> Router + Send>>,
}

impl WebServer {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            router: Router::new(),
            addr: addr.into(),
            middlewares: Vec::new(),
        }
    }

    pub fn layer_babel(mut self, babel: Babel) -> Self {
        self.middlewares
            .push(Box::new(move |r| r.layer(from_fn_with_state(babel, handle_babel))));
        self
    }

    pub fn layer_fn<F, Fut>(mut self, f: F) -> Self
    where
        F: Clone + Send + Sync + 'static + Fn(Request, Next) -> Fut,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.middlewares.push(Box::new(|r| r.layer(from_fn(f))));
        self
    }

    pub fn mount(mut self, router: Router) -> Self {
        self.router = self.router.merge(router);
        self
    }

    /// Mounted routes with every layer applied, in registration order.
    pub fn into_router(self) -> Router {
        self.middlewares
            .into_iter()
            .fold(self.router, |router, m| m(router))
    }

    pub async fn start(self) -> anyhow::Result<()> {
        let addr = self.addr.clone();
        log::info!("🚀 Starting web server at {}", addr);

        let router = self.into_router();
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        let server = axum::serve(listener, router).with_graceful_shutdown(wait_for_shutdown());
        if let Err(e) = server.await {
            log::error!("Server error: {}", e);
            return Err(anyhow::anyhow!("Server error: {}", e));
        }

        log::info!("🛑 Server stopped");
        Ok(())
    }
}

async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log::info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            log::info!("Received terminate signal, starting graceful shutdown");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::current_locale;
    use axum::{body::Body, routing::get};
    use http::Request;
    use polyglot_core::BabelConfig;
    use tower::util::ServiceExt;

    async fn check_locale() -> String {
        current_locale()
            .map(|l| l.to_string())
            .unwrap_or_else(|| "not set".to_string())
    }

    async fn body(app: Router, req: Request<Body>) -> String {
        let response = ServiceExt::oneshot(app, req).await.unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    fn babel() -> Babel {
        Babel::new(BabelConfig::new().default_locale("de").locales_dirs(["does-not-exist"]))
    }

    #[tokio::test]
    async fn test_layer_after_mount() {
        let app = WebServer::new("0.0.0.0:0")
            .mount(Router::new().route("/", get(check_locale)))
            .layer_babel(babel())
            .into_router();

        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        assert_eq!(body(app, req).await, "de");
    }

    #[tokio::test]
    async fn test_layer_before_mount() {
        let app = WebServer::new("0.0.0.0:0")
            .layer_babel(babel())
            .mount(Router::new().route("/", get(check_locale)))
            .into_router();

        let req = Request::builder()
            .uri("/")
            .header("accept-language", "pt-BR, en;q=0.3")
            .body(Body::empty())
            .unwrap();
        assert_eq!(body(app, req).await, "pt_BR");
    }

    #[tokio::test]
    async fn test_layer_fn_runs() {
        async fn stamp(req: axum::extract::Request, next: Next) -> Response {
            let mut res = next.run(req).await;
            res.headers_mut().insert("x-stamp", "1".parse().unwrap());
            res
        }

        let app = WebServer::new("0.0.0.0:0")
            .layer_fn(stamp)
            .mount(Router::new().route("/", get(check_locale)))
            .into_router();

        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = ServiceExt::oneshot(app, req).await.unwrap();
        assert_eq!(response.headers()["x-stamp"], "1");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"not set");
    }
}
