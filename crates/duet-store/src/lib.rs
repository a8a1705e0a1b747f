pub mod chat;
pub mod error;
pub mod seed;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{info, warn};

use duet_types::Document;

pub use chat::LoginOutcome;
pub use error::{ChatError, Result, StoreError};
pub use seed::Seed;

use error::Unusable;

/// Flat-file JSON store holding the entire [`Document`].
///
/// Nothing is cached: every operation loads the file, and every write
/// overwrites it in full. The mutex makes each load-modify-save a single
/// unit within this process; other processes sharing the file still race.
pub struct Store {
    path: PathBuf,
    seed: Seed,
    lock: Mutex<()>,
}

impl Store {
    pub fn open(path: &Path, seed: Seed) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        info!("Document store at {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            seed,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document, reseeding the file if it is missing, empty, not
    /// JSON, or lacks a `users` list.
    pub fn load(&self) -> Result<Document> {
        let _guard = self.lock()?;
        self.load_unlocked()
    }

    /// Overwrite the backing file with `doc`.
    pub fn save(&self, doc: &Document) -> Result<()> {
        let _guard = self.lock()?;
        self.save_unlocked(doc)
    }

    pub fn read<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Document) -> T,
    {
        let _guard = self.lock()?;
        let doc = self.load_unlocked()?;
        Ok(f(&doc))
    }

    /// Load, mutate and save while holding the lock.
    pub fn update<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Document) -> T,
    {
        let _guard = self.lock()?;
        let mut doc = self.load_unlocked()?;
        let out = f(&mut doc);
        self.save_unlocked(&doc)?;
        Ok(out)
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn load_unlocked(&self) -> Result<Document> {
        match read_document(&self.path) {
            Ok(value) => serde_json::from_value(value).map_err(StoreError::Decode),
            Err(reason) => {
                warn!(
                    "Cannot use {} ({}), reseeding with default data",
                    self.path.display(),
                    reason
                );
                let doc = self.seed.document();
                self.save_unlocked(&doc)?;
                Ok(doc)
            }
        }
    }

    fn save_unlocked(&self, doc: &Document) -> Result<()> {
        let bytes = encode(doc)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}

/// The raw document, provided it is an object with a `users` list.
/// Record contents are not checked here.
fn read_document(path: &Path) -> std::result::Result<serde_json::Value, Unusable> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(Unusable::Missing),
        Err(e) => return Err(Unusable::Unreadable(e)),
    };

    if contents.trim().is_empty() {
        return Err(Unusable::Empty);
    }

    let value: serde_json::Value = serde_json::from_str(&contents).map_err(Unusable::Invalid)?;
    if !value.get("users").is_some_and(|users| users.is_array()) {
        return Err(Unusable::NoUsers);
    }

    Ok(value)
}

/// Pretty JSON with four-space indentation and a trailing newline.
/// Non-ASCII text is written as-is.
fn encode(doc: &Document) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    doc.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(&dir.path().join("data.json"), Seed::default()).unwrap();
        (dir, store)
    }

    #[test]
    fn missing_file_is_seeded_and_written() {
        let (_dir, store) = temp_store();
        assert!(!store.path().exists());

        let doc = store.load().unwrap();
        assert_eq!(doc.users.len(), 2);
        assert_eq!(doc.chats["ali_123_athraa_456"].len(), 2);

        let on_disk: Document =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(on_disk, doc);
    }

    #[test]
    fn corrupt_or_empty_file_is_reseeded() {
        let (_dir, store) = temp_store();

        let inputs = [
            "{not json",
            "",
            "   \n",
            "[1, 2, 3]",
            "[[], {}]",
            r#"{"chats": {}}"#,
            r#"{"users": 5}"#,
        ];
        for garbage in inputs {
            fs::write(store.path(), garbage).unwrap();
            let doc = store.load().unwrap();
            assert_eq!(doc.users[0].uid, "ali_123", "input {:?}", garbage);

            let rewritten = fs::read_to_string(store.path()).unwrap();
            assert!(rewritten.contains("\"athraa_456\""), "input {:?}", garbage);
        }
    }

    #[test]
    fn valid_document_is_returned_unchanged() {
        let (_dir, store) = temp_store();
        fs::write(
            store.path(),
            r#"{"users": [{"uid": "x", "username": "x", "password": "p"}], "chats": {}}"#,
        )
        .unwrap();

        let doc = store.load().unwrap();
        assert_eq!(doc.users.len(), 1);
        assert_eq!(doc.users[0].uid, "x");
        assert!(doc.chats.is_empty());
    }

    #[test]
    fn python_written_document_loads_without_reseed() {
        let (_dir, store) = temp_store();
        let legacy = r#"{
    "users": [
        {"uid": "ali_123", "username": "ali", "fullName": "علي", "password": "aaaaaa", "description": "", "photoURL": "/static/default.png"},
        {"uid": "athraa_456", "username": "athraa", "fullName": "سجاد", "password": "aaaaaa", "description": "", "photoURL": "/static/default.png"}
    ],
    "chats": {
        "ali_123_athraa_456": [
            {"senderId": "ali_123", "recipientId": "athraa_456", "content": "old one", "type": null, "timestamp": "2024-05-01T10:00:00.123456"},
            {"senderId": "athraa_456", "recipientId": "ali_123", "content": "old two", "type": "image", "timestamp": "2024-05-01T10:05:00.654321"}
        ]
    }
}"#;
        fs::write(store.path(), legacy).unwrap();

        let doc = store.load().unwrap();
        let thread = &doc.chats["ali_123_athraa_456"];
        assert_eq!(thread.len(), 2);
        assert_eq!(thread[0].content, "old one");
        assert_eq!(thread[0].kind, "text");
        assert_eq!(thread[0].timestamp, "2024-05-01T10:00:00.123456");
        assert_eq!(thread[1].kind, "image");

        // A clean load never writes.
        assert_eq!(fs::read_to_string(store.path()).unwrap(), legacy);
    }

    #[test]
    fn undecodable_records_are_an_error_not_a_reseed() {
        let (_dir, store) = temp_store();
        let odd = r#"{"users": [{"uid": 5}], "chats": {"a_b": [{"content": "keep me"}]}}"#;
        fs::write(store.path(), odd).unwrap();

        assert!(matches!(store.load(), Err(StoreError::Decode(_))));
        assert!(matches!(
            store.update(|doc| doc.chats.clear()),
            Err(StoreError::Decode(_))
        ));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), odd);
    }

    #[test]
    fn save_of_load_is_byte_stable() {
        let (_dir, store) = temp_store();
        store.load().unwrap();

        let doc = store.load().unwrap();
        store.save(&doc).unwrap();
        let first = fs::read(store.path()).unwrap();

        let doc = store.load().unwrap();
        store.save(&doc).unwrap();
        let second = fs::read(store.path()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn file_is_pretty_printed_with_literal_unicode() {
        let (_dir, store) = temp_store();
        store.load().unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.starts_with("{\n    \"users\": ["));
        assert!(raw.contains("علي الطائي"));
        assert!(!raw.contains("\\u"));
        assert!(raw.ends_with("}\n"));
    }

    #[test]
    fn update_persists_mutation() {
        let (_dir, store) = temp_store();
        store
            .update(|doc| doc.chats.insert("a_b".into(), Vec::new()))
            .unwrap();

        assert!(store.load().unwrap().chats.contains_key("a_b"));
    }

    #[test]
    fn open_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/data.json");
        let store = Store::open(&path, Seed::default()).unwrap();
        store.load().unwrap();
        assert!(path.exists());
    }
}
