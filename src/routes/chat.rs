use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::{
    error::AppError,
    message::{ChatReply, ChatRequest},
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, AppError> {
    let Json(payload) = payload.map_err(|e| {
        tracing::warn!(error = %e, "rejected /api/chat body");
        AppError::from(e)
    })?;
    tracing::debug!(?payload, "incoming /api/chat request");

    let Some(message) = payload.text() else {
        tracing::warn!("no message provided in request body");
        return Err(AppError::no_message());
    };

    let response = state.upstream.generate(message).await.inspect_err(|e| {
        tracing::error!(error = %e, "Gemini call failed");
    })?;
    tracing::debug!(?response, "Gemini raw response");

    Ok(Json(ChatReply { reply: response.reply_or_placeholder() }))
}
