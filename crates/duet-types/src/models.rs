use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Tag used when a message arrives without a `type`.
pub const DEFAULT_MESSAGE_KIND: &str = "text";

/// Every field is optional on read: hand-edited records load as they are.
/// Fields this service does not know about are kept in `extra` and written
/// back untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    /// Stored and compared in plaintext.
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "photoURL", default)]
    pub photo_url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub recipient_id: String,
    #[serde(default)]
    pub content: String,
    /// "text" or a media tag chosen by the client.
    #[serde(rename = "type", default = "default_kind", deserialize_with = "kind_or_default")]
    pub kind: String,
    /// ISO-8601. Kept verbatim, so stamps written by other tools survive.
    #[serde(default)]
    pub timestamp: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    /// A new message stamped with the current UTC time.
    pub fn new(sender_id: &str, recipient_id: &str, content: &str, kind: Option<&str>) -> Self {
        Self {
            sender_id: sender_id.to_string(),
            recipient_id: recipient_id.to_string(),
            content: content.to_string(),
            kind: kind
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .unwrap_or_else(default_kind),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            extra: Map::new(),
        }
    }
}

/// The whole persisted state: every user and every conversation thread.
///
/// `chats` is key-sorted so two saves of the same document produce the
/// same bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub users: Vec<User>,
    #[serde(default)]
    pub chats: BTreeMap<String, Vec<Message>>,
}

impl Document {
    /// A user without a password can never log in.
    pub fn user_by_credentials(&self, username: &str, password: &str) -> Option<&User> {
        self.users.iter().find(|u| {
            !u.password.is_empty() && u.username == username && u.password == password
        })
    }

    /// First user whose uid differs from `uid`. Only meaningful with two users.
    pub fn opponent_of(&self, uid: &str) -> Option<&User> {
        self.users.iter().find(|u| u.uid != uid)
    }
}

fn default_kind() -> String {
    DEFAULT_MESSAGE_KIND.to_string()
}

fn kind_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_kind))
}
