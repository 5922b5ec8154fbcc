use super::types::ChatReply;
use crate::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub const INVALID_MESSAGE_REPLY: &str = "Please enter a message.";
pub const RATE_LIMITED_REPLY: &str = "API limit reached. Please try again later.";
pub const MODEL_NOT_FOUND_REPLY: &str =
    "Model not found on Hugging Face. Please try again later or contact support.";
pub const UPSTREAM_FAILURE_REPLY: &str = "Sorry, something went wrong with the AI. Try again!";

#[derive(thiserror::Error, Debug)]
pub enum ChatError {
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("Inference API rate limit reached")]
    RateLimited,

    #[error("Model not found")]
    ModelNotFound,

    #[error("{0}")]
    Upstream(String),
}

impl ChatError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidMessage(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::ModelNotFound => StatusCode::NOT_FOUND,
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn reply(&self) -> ChatReply {
        match self {
            Self::InvalidMessage(detail) => ChatReply {
                response: INVALID_MESSAGE_REPLY.to_string(),
                error: Some(detail.clone()),
            },
            Self::RateLimited => ChatReply::ok(RATE_LIMITED_REPLY),
            Self::ModelNotFound => ChatReply::ok(MODEL_NOT_FOUND_REPLY),
            Self::Upstream(message) => ChatReply {
                response: UPSTREAM_FAILURE_REPLY.to_string(),
                error: Some(message.clone()),
            },
        }
    }
}

impl From<Error> for ChatError {
    fn from(error: Error) -> Self {
        match error.upstream_status() {
            Some(429) => Self::RateLimited,
            Some(404) => Self::ModelNotFound,
            _ => Self::Upstream(error.to_string()),
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.reply())).into_response()
    }
}
