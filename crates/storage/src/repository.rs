use async_trait::async_trait;
use lesson_core::model::{CourseId, KEY_SEPARATOR};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

/// Prefix shared by every persisted progress blob.
pub const PROGRESS_KEY_PREFIX: &str = "course_progress";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    /// The backend cannot be reached at all right now (closed pool, poisoned
    /// lock). Retrying later may succeed.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Course-namespaced key under which a course's progress blob is stored.
#[must_use]
pub fn progress_key(course: &CourseId) -> String {
    format!("{PROGRESS_KEY_PREFIX}{KEY_SEPARATOR}{course}")
}

/// Raw string key-value port holding encoded progress blobs.
///
/// Adapters only move strings; encoding lives in [`crate::codec`].
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Read the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the write.
    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the blob under `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be updated.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Simple in-memory store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    blobs: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            blobs: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn blobs(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.blobs
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl ProgressStore for InMemoryRepository {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.blobs()?.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.blobs()?.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.blobs()?.remove(key);
        Ok(())
    }
}

/// Holds the progress store behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let progress: Arc<dyn ProgressStore> = Arc::new(InMemoryRepository::new());
        Self { progress }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_key_is_course_namespaced() {
        let course = CourseId::new("basics").unwrap();
        assert_eq!(progress_key(&course), "course_progress:basics");
    }

    #[tokio::test]
    async fn read_missing_key_is_none() {
        let repo = InMemoryRepository::new();
        assert!(repo.read("course_progress:basics").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn write_replaces_and_remove_deletes() {
        let repo = InMemoryRepository::new();
        repo.write("k", "{}").await.unwrap();
        repo.write("k", r#"{"camera":"completed"}"#).await.unwrap();
        assert_eq!(
            repo.read("k").await.unwrap().as_deref(),
            Some(r#"{"camera":"completed"}"#)
        );

        repo.remove("k").await.unwrap();
        repo.remove("k").await.unwrap();
        assert!(repo.read("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn poisoned_lock_reports_unavailable() {
        let repo = InMemoryRepository::new();
        let blobs = Arc::clone(&repo.blobs);
        let poisoned = std::thread::spawn(move || {
            let _guard = blobs.lock().unwrap();
            panic!("poison the lock");
        })
        .join();
        assert!(poisoned.is_err());

        assert!(matches!(
            repo.read("k").await,
            Err(StorageError::Unavailable(_))
        ));
        assert!(matches!(
            repo.write("k", "{}").await,
            Err(StorageError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn clones_share_the_same_blobs() {
        let storage = Storage::in_memory();
        let other = storage.clone();
        storage.progress.write("k", "v").await.unwrap();
        assert_eq!(other.progress.read("k").await.unwrap().as_deref(), Some("v"));
    }
}
