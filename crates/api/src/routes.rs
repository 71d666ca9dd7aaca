use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

/// Proxy routes, meant to be nested under `/api`.
pub fn create_api_routes(state: AppState) -> Router {
    Router::new()
        .route("/tmdb", get(handlers::proxy_tmdb))
        .route("/tmdb/", get(handlers::proxy_tmdb))
        .route("/tmdb/{*path}", get(handlers::proxy_tmdb))
        .route("/gpt", post(handlers::proxy_gpt))
        .with_state(state)
}
