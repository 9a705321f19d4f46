use crate::render::error_view;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors a wiki handler can end in. Not-found pages are not errors.
#[derive(Debug, thiserror::Error)]
pub enum WikiError {
    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),

    #[error("no session attached to the request")]
    MissingSession,
}

impl IntoResponse for WikiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");

        // the page never shows the underlying cause
        let message = match self {
            WikiError::Storage(_) => "The page store could not complete the request.",
            WikiError::MissingSession => "The session could not be loaded.",
        };

        (StatusCode::INTERNAL_SERVER_ERROR, error_view(message)).into_response()
    }
}
