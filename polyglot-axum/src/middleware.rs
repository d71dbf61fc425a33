use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;

use crate::babel::Babel;
use crate::context::with_locale;
use crate::err::Error;

/// Resolve the request locale and run the rest of the stack inside its scope.
///
/// Mount with `axum::middleware::from_fn_with_state(babel, handle_babel)`.
/// The [`Babel`] handle and the resolved `Locale` are also put in the request
/// extensions for extractors.
pub async fn handle_babel(
    State(babel): State<Babel>,
    req: Request,
    next: Next,
) -> Result<Response, Error> {
    let (mut parts, body) = req.into_parts();
    let locale = babel.resolve_locale(&parts).await?;

    parts.extensions.insert(babel);
    parts.extensions.insert(locale.clone());
    let req = Request::from_parts(parts, body);

    let span = tracing::debug_span!("babel", locale = %locale);
    Ok(with_locale(locale, next.run(req)).instrument(span).await)
}
