pub mod proxy_chat_completion;
pub mod proxy_movie_metadata;

pub use proxy_chat_completion::ProxyChatCompletionUseCase;
pub use proxy_movie_metadata::ProxyMovieMetadataUseCase;
