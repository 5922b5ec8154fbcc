mod error;
mod proxy;
mod types;

pub use error::*;
pub use proxy::{ChatProxy, EMPTY_GENERATION_REPLY};
pub use types::{ChatReply, ChatRequest};
