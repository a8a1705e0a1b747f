use axum::{
    Router,
    routing::{get, post},
};

use crate::auth::{self, AppState};
use crate::messages;

/// The chat endpoints. Static files, CORS and tracing are layered on by the server.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/login", post(auth::login))
        .route("/messages", get(messages::get_messages))
        .route("/send", post(messages::send_message))
        .with_state(state)
}
