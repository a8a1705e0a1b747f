pub mod api;
pub mod conversation;
pub mod models;

pub use conversation::conversation_key;
pub use models::{DEFAULT_MESSAGE_KIND, Document, Message, User};
