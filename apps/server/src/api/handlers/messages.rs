//! Messaging handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    auth::CurrentUser,
    models::{ConversationDetail, CreateMessageDto, Message, MessageDetail},
    state::AppState,
    Result,
};

pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<CreateMessageDto>,
) -> Result<impl IntoResponse> {
    let message = state.messages_service.create(dto).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn conversations(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<Vec<ConversationDetail>>> {
    Ok(Json(
        state.messages_service.get_conversations(claims.sub).await?,
    ))
}

pub async fn conversation_messages(
    State(state): State<AppState>,
    Path(conversation_id): Path<Uuid>,
) -> Result<Json<Vec<MessageDetail>>> {
    Ok(Json(
        state
            .messages_service
            .find_by_conversation(conversation_id)
            .await?,
    ))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Message>> {
    Ok(Json(state.messages_service.mark_as_read(id).await?))
}
