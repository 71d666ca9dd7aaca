use super::relay;
use crate::{errors::ApiError, state::AppState};
use axum::{extract::State, http::Uri, response::IntoResponse};
use tracing::{debug, instrument};

const ROUTE_PREFIX: &str = "/tmdb";

/// Serves `/tmdb`, `/tmdb/` and `/tmdb/{*path}`.
///
/// The suffix is taken from the raw request URI so percent-encoded bytes
/// reach the upstream exactly as the client sent them.
#[instrument(skip(state), name = "api_proxy_tmdb")]
pub async fn proxy_tmdb(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<impl IntoResponse, ApiError> {
    let path = uri.path();
    let suffix = path.strip_prefix(ROUTE_PREFIX).unwrap_or(path);

    let response = state
        .movie_metadata
        .execute(suffix, uri.query().unwrap_or_default())
        .await
        .map_err(ApiError::MovieMetadata)?;

    debug!(status = response.status, "TMDB response relayed");
    Ok(relay(response))
}
