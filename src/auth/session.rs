use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::warn;

/// Fixed key the admin session lives under.
pub const SESSION_KEY: &str = "adminSession";

/// Marker of a logged-in admin. Stored as `{"email":"..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminSession {
    pub email: String,
}

/// Synchronous, device-local key-value storage.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Overwrite any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// No-op when the key is absent.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// One file per key under a directory; survives process restarts.
///
/// Writes go to a temp file in the same directory and are renamed into place,
/// so readers see either the old value or the new one.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    /// Create the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    fn tmp_path_for(&self, key: &str) -> PathBuf {
        let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
        self.dir.join(format!(".{key}.{}.{seq}.tmp", process::id()))
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read session entry");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let tmp = self.tmp_path_for(key);
        let written = File::create(&tmp).and_then(|mut f| {
            f.write_all(value.as_bytes())?;
            f.sync_all()
        });
        if let Err(e) = written.and_then(|()| fs::rename(&tmp, self.path_for(key))) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_overwrites_and_removes() {
        let store = MemorySessionStore::new();
        assert_eq!(store.get(SESSION_KEY), None);

        store.set(SESSION_KEY, "one").unwrap();
        store.set(SESSION_KEY, "two").unwrap();
        assert_eq!(store.get(SESSION_KEY).as_deref(), Some("two"));

        store.remove(SESSION_KEY).unwrap();
        store.remove(SESSION_KEY).unwrap();
        assert_eq!(store.get(SESSION_KEY), None);
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let first = FileSessionStore::new(dir.path().join("sessions")).unwrap();
        first.set(SESSION_KEY, r#"{"email":"a@x.com"}"#).unwrap();

        let second = FileSessionStore::new(first.dir().to_path_buf()).unwrap();
        assert_eq!(
            second.get(SESSION_KEY).as_deref(),
            Some(r#"{"email":"a@x.com"}"#)
        );

        second.remove(SESSION_KEY).unwrap();
        assert_eq!(first.get(SESSION_KEY), None);
    }

    #[test]
    fn file_store_set_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path()).unwrap();
        store.set(SESSION_KEY, r#"{"email":"a@x.com"}"#).unwrap();
        store.set(SESSION_KEY, r#"{"email":"b@x.com"}"#).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![SESSION_KEY.to_string()]);
        assert_eq!(
            store.get(SESSION_KEY).as_deref(),
            Some(r#"{"email":"b@x.com"}"#)
        );
    }

    #[test]
    fn file_store_readers_never_see_partial_writes() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(FileSessionStore::new(dir.path()).unwrap());
        let first = format!(r#"{{"email":"{}@x.com"}}"#, "a".repeat(4096));
        let second = format!(r#"{{"email":"{}@x.com"}}"#, "b".repeat(4096));
        store.set(SESSION_KEY, &first).unwrap();

        let writer = {
            let store = store.clone();
            let (first, second) = (first.clone(), second.clone());
            std::thread::spawn(move || {
                for i in 0..200 {
                    let value = if i % 2 == 0 { &second } else { &first };
                    store.set(SESSION_KEY, value).unwrap();
                }
            })
        };

        for _ in 0..200 {
            let seen = store.get(SESSION_KEY).expect("session entry vanished");
            assert!(seen == first || seen == second, "partial value observed");
        }
        writer.join().unwrap();
    }

    #[test]
    fn file_store_remove_missing_key_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path()).unwrap();
        store.remove(SESSION_KEY).unwrap();
    }

    #[test]
    fn session_serializes_as_email_object() {
        let text = serde_json::to_string(&AdminSession {
            email: "a@x.com".to_string(),
        })
        .unwrap();
        assert_eq!(text, r#"{"email":"a@x.com"}"#);
    }
}
