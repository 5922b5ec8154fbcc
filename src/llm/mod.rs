mod client;
mod prompt;
mod types;

pub use client::{HuggingFaceClient, InferenceClient};
pub use prompt::PromptTemplate;
pub use types::*;
