use tracing::info;

use duet_types::{Message, User, conversation_key};

use crate::Store;
use crate::error::ChatError;

/// A successful login: the user and the other party of their chat.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    /// First other user in the table. With more than two users this is
    /// simply whoever is listed first.
    pub opponent: Option<User>,
}

impl Store {
    /// Exact plaintext match on username and password. Unknown users and
    /// wrong passwords produce the same error.
    pub fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, ChatError> {
        let outcome = self.read(|doc| {
            doc.user_by_credentials(username, password)
                .map(|user| LoginOutcome {
                    user: user.clone(),
                    opponent: doc.opponent_of(&user.uid).cloned(),
                })
        })?;

        outcome.ok_or(ChatError::InvalidCredentials)
    }

    /// The thread between two users, empty if they have never talked.
    pub fn messages(&self, my_id: &str, recipient_id: &str) -> Result<Vec<Message>, ChatError> {
        if my_id.is_empty() || recipient_id.is_empty() {
            return Err(ChatError::MissingIdentifiers);
        }

        let key = conversation_key(my_id, recipient_id);
        let messages = self.read(|doc| doc.chats.get(&key).cloned().unwrap_or_default())?;
        Ok(messages)
    }

    /// Append a message to the pair's thread and persist the document.
    pub fn send_message(
        &self,
        sender_id: &str,
        recipient_id: &str,
        content: &str,
        kind: Option<&str>,
    ) -> Result<Message, ChatError> {
        if sender_id.is_empty() || recipient_id.is_empty() || content.is_empty() {
            return Err(ChatError::MissingMessageFields);
        }

        let key = conversation_key(sender_id, recipient_id);
        let message = self.update(|doc| {
            let message = Message::new(sender_id, recipient_id, content, kind);
            doc.chats.entry(key.clone()).or_default().push(message.clone());
            message
        })?;

        info!("Stored {} message in {}", message.kind, key);
        Ok(message)
    }
}
