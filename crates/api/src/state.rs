use pinproxy_application::use_cases::{ProxyChatCompletionUseCase, ProxyMovieMetadataUseCase};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub movie_metadata: Arc<ProxyMovieMetadataUseCase>,
    pub chat_completion: Arc<ProxyChatCompletionUseCase>,
}
