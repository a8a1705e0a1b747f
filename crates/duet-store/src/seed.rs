use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::info;

use duet_types::{Document, Message, User, conversation_key};

use crate::error::{Result, StoreError};

const DEFAULT_PROFILE_PIC: &str = "/static/default.png";

const WELCOME_FROM_FIRST: &str = "السلام عليكم! هذا هو مشروع الدردشة.";
const WELCOME_FROM_SECOND: &str = "مرحباً علي، الرسائل محفوظة الآن بشكل دائم!";

/// Users written into a fresh document, plus the welcome thread between the
/// first two of them.
#[derive(Debug, Clone)]
pub struct Seed {
    users: Vec<User>,
}

impl Default for Seed {
    fn default() -> Self {
        Self {
            users: builtin_users(),
        }
    }
}

impl Seed {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    /// Load the user table from a JSON array of users.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let users: Vec<User> = serde_json::from_str(&contents)?;
        if users.is_empty() {
            return Err(StoreError::Seed(format!("{} lists no users", path.display())));
        }

        info!("Loaded {} seed users from {}", users.len(), path.display());
        Ok(Self { users })
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// A fresh document; message timestamps are taken now.
    pub fn document(&self) -> Document {
        let mut chats = BTreeMap::new();
        if let [first, second, ..] = self.users.as_slice() {
            chats.insert(
                conversation_key(&first.uid, &second.uid),
                vec![
                    Message::new(&first.uid, &second.uid, WELCOME_FROM_FIRST, None),
                    Message::new(&second.uid, &first.uid, WELCOME_FROM_SECOND, None),
                ],
            );
        }

        Document {
            users: self.users.clone(),
            chats,
        }
    }
}

fn builtin_users() -> Vec<User> {
    vec![
        User {
            uid: "ali_123".into(),
            username: "ali".into(),
            full_name: "علي الطائي".into(),
            password: "aaaaaa".into(),
            description: "المستخدم الأول (علي)".into(),
            photo_url: DEFAULT_PROFILE_PIC.into(),
            ..Default::default()
        },
        User {
            uid: "athraa_456".into(),
            username: "athraa".into(),
            full_name: "سجاد".into(),
            password: "aaaaaa".into(),
            description: "المستخدم الثاني (سجاد)".into(),
            photo_url: DEFAULT_PROFILE_PIC.into(),
            ..Default::default()
        },
    ]
}
