use thiserror::Error;

/// Failures of the document store itself.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The file has a users list but its records cannot be read. Left on
    /// disk untouched.
    #[error("cannot decode document: {0}")]
    Decode(serde_json::Error),

    #[error("store lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("seed error: {0}")]
    Seed(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Outcomes of the chat operations that callers are expected to handle.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("both user ids are required")]
    MissingIdentifiers,

    #[error("message data is missing")]
    MissingMessageFields,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Why a backing file could not be used as-is. Always recovered by reseeding.
#[derive(Debug, Error)]
pub(crate) enum Unusable {
    #[error("file is missing")]
    Missing,

    #[error("cannot read file: {0}")]
    Unreadable(std::io::Error),

    #[error("file is empty")]
    Empty,

    #[error("not an object with a users list")]
    NoUsers,

    #[error("invalid document: {0}")]
    Invalid(serde_json::Error),
}
