use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// [`polyglot_core::Error`] as an axum response.
///
/// An unparsable locale is the client's fault and maps to `400`; everything
/// else is a `500`.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(#[from] polyglot_core::Error);

impl Error {
    pub fn inner(&self) -> &polyglot_core::Error {
        &self.0
    }

    pub fn status(&self) -> StatusCode {
        match self.0 {
            polyglot_core::Error::LocaleParse { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{:?}", self.0);
        } else {
            tracing::warn!("{}", self.0);
        }
        (status, self.0.to_string()).into_response()
    }
}
