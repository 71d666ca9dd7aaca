use super::relay;
use crate::{dto::ChatRequest, errors::ApiError, state::AppState};
use axum::{extract::State, response::IntoResponse, Json};
use tracing::{debug, instrument};

#[instrument(skip_all, name = "api_proxy_gpt")]
pub async fn proxy_gpt(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state
        .chat_completion
        .execute(request.messages)
        .await
        .map_err(ApiError::ChatCompletion)?;

    debug!(
        status = response.status,
        model = %state.chat_completion.model(),
        "Chat completion relayed"
    );
    Ok(relay(response))
}
