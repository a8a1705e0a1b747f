pub mod auth;
pub mod error;
pub mod messages;
pub mod routes;

pub use auth::{AppState, AppStateInner};
pub use error::ApiError;
pub use routes::router;
