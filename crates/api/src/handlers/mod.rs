pub mod gpt;
pub mod health;
pub mod tmdb;

pub use gpt::proxy_gpt;
pub use health::liveness;
pub use tmdb::proxy_tmdb;

use axum::{http::StatusCode, response::IntoResponse, Json};
use pinproxy_domain::UpstreamResponse;

/// Relays the upstream's status and JSON body unchanged.
pub(crate) fn relay(response: UpstreamResponse) -> impl IntoResponse {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::BAD_GATEWAY);
    (status, Json(response.body))
}
