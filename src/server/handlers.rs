use super::types::ErrorResponse;
use crate::{
    Error,
    chat::{ChatError, ChatProxy, ChatReply, ChatRequest},
    feedback::{Comment, FeedbackStorage, NewComment, NewRating, Rating, RatingSummary},
};
use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<ChatProxy>,
    pub feedback: Arc<FeedbackStorage>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ChatError> {
    let request_id = Uuid::new_v4();

    async move {
        // Body rejections still answer with the chat envelope.
        let Json(request) = payload.map_err(|rejection| {
            warn!("Rejected chat request body: {}", rejection.body_text());
            ChatError::InvalidMessage(rejection.body_text())
        })?;

        info!("Received chat request");
        let reply = state.proxy.reply(&request).await?;
        info!("Chat request completed");
        Ok::<_, ChatError>(Json(reply))
    }
    .instrument(info_span!("chat", %request_id))
    .await
}

pub async fn list_comments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let comments = state.feedback.list_comments().await.map_err(api_error)?;
    Ok(Json(comments))
}

pub async fn create_comment(
    State(state): State<AppState>,
    payload: Result<Json<NewComment>, JsonRejection>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let Json(input) = payload.map_err(rejection_error)?;
    let comment = Comment::new(&input.name, &input.text).map_err(api_error)?;
    let saved = state.feedback.add_comment(comment).await.map_err(api_error)?;

    info!("Stored comment from {}", saved.name);
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn rating_summary(
    State(state): State<AppState>,
) -> Result<Json<RatingSummary>, ApiError> {
    let summary = state.feedback.rating_summary().await.map_err(api_error)?;
    Ok(Json(summary))
}

pub async fn create_rating(
    State(state): State<AppState>,
    payload: Result<Json<NewRating>, JsonRejection>,
) -> Result<(StatusCode, Json<RatingSummary>), ApiError> {
    let Json(input) = payload.map_err(rejection_error)?;
    let rating = Rating::new(input.value).map_err(api_error)?;
    state.feedback.add_rating(rating).await.map_err(api_error)?;

    let summary = state.feedback.rating_summary().await.map_err(api_error)?;
    info!(
        "Stored rating {}, average now {} from {} voters",
        input.value, summary.average, summary.voters
    );
    Ok((StatusCode::CREATED, Json(summary)))
}

// Any unreadable feedback body is a validation failure, reported as 400.
fn rejection_error(rejection: JsonRejection) -> ApiError {
    warn!("Rejected feedback body: {}", rejection.body_text());
    api_error(Error::validation(rejection.body_text()))
}

fn api_error(e: Error) -> ApiError {
    let status = match e {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        _ => {
            error!("Feedback request failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}
