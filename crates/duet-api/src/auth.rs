use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use tracing::info;

use duet_store::{ChatError, Store};
use duet_types::api::{LoginRequest, LoginResponse, UserProfile};

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Store,
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = req.username.clone();

    // File I/O stays off the async runtime
    let result = tokio::task::spawn_blocking(move || state.store.login(&req.username, &req.password))
        .await?;

    if let Err(ChatError::InvalidCredentials) = &result {
        info!("Rejected login for '{}'", username);
    }
    let outcome = result?;
    info!("User '{}' logged in", outcome.user.username);

    Ok(Json(LoginResponse {
        success: true,
        user: UserProfile::from(&outcome.user),
        opponent: outcome.opponent.as_ref().map(UserProfile::from),
    }))
}
