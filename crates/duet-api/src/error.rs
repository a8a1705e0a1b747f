use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use duet_store::ChatError;
use duet_types::api::{ErrorResponse, LoginFailure};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Chat(ChatError::InvalidCredentials) => (
                StatusCode::UNAUTHORIZED,
                Json(LoginFailure {
                    success: false,
                    message: ChatError::InvalidCredentials.to_string(),
                }),
            )
                .into_response(),
            ApiError::Chat(e @ (ChatError::MissingIdentifiers | ChatError::MissingMessageFields)) => {
                bad_request(e.to_string())
            }
            ApiError::Chat(ChatError::Store(e)) => {
                error!("Store failure: {}", e);
                internal_error()
            }
            ApiError::Join(e) => {
                error!("spawn_blocking join error: {}", e);
                internal_error()
            }
        }
    }
}

fn bad_request(error: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response()
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "internal server error".into(),
        }),
    )
        .into_response()
}
