mod storage;
mod types;

pub use storage::FeedbackStorage;
pub use types::*;
