pub mod gpt;

pub use gpt::ChatRequest;
