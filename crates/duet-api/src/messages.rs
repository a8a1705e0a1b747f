use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};

use duet_types::api::{MessagesQuery, MessagesResponse, SendMessageRequest, SendMessageResponse};

use crate::auth::AppState;
use crate::error::ApiError;

/// GET /messages?myId=&recipientId=
pub async fn get_messages(
    State(state): State<AppState>,
    Query(query): Query<MessagesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let my_id = query.my_id.unwrap_or_default();
    let recipient_id = query.recipient_id.unwrap_or_default();

    let messages =
        tokio::task::spawn_blocking(move || state.store.messages(&my_id, &recipient_id))
            .await??;

    Ok(Json(MessagesResponse { messages }))
}

/// POST /send
pub async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let message = tokio::task::spawn_blocking(move || {
        state.store.send_message(
            &req.sender_id,
            &req.recipient_id,
            &req.content,
            req.kind.as_deref(),
        )
    })
    .await??;

    Ok(Json(SendMessageResponse {
        success: true,
        message,
    }))
}
