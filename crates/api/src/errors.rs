use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pinproxy_domain::ForwardError;
use serde_json::json;
use tracing::error;

/// A failed proxy call, tagged with the route it came from.
///
/// Clients only ever see the route's fixed message; the cause goes to the log.
#[derive(Debug)]
pub enum ApiError {
    MovieMetadata(ForwardError),
    ChatCompletion(ForwardError),
}

impl ApiError {
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MovieMetadata(_) => "Failed to fetch TMDB data",
            Self::ChatCompletion(_) => "Failed to fetch from OpenAI",
        }
    }

    pub fn forward_error(&self) -> &ForwardError {
        match self {
            Self::MovieMetadata(e) | Self::ChatCompletion(e) => e,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let source = self.forward_error();
        error!(
            kind = %source.kind,
            cause = %source.cause,
            "{}",
            self.public_message()
        );

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.public_message() })),
        )
            .into_response()
    }
}
