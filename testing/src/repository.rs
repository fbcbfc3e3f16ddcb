//! In-memory [`StateRepository`] for fast, deterministic tests
//!
//! Besides the trait operations it can be told to fail writes and can hold
//! raw (possibly corrupt) blobs, so tests can exercise the best-effort
//! persistence paths.

use pickup_core::environment::{RepositoryError, StateRepository};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// In-memory key/blob storage
///
/// # Example
///
/// ```
/// use pickup_testing::InMemoryRepository;
/// use pickup_core::StateRepository;
///
/// let repo = InMemoryRepository::new();
/// repo.save("cart", "[]").unwrap();
/// assert_eq!(repo.load("cart").unwrap().as_deref(), Some("[]"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryRepository {
    data: Arc<RwLock<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryRepository {
    /// Create a new empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw blob, bypassing any typed encoding
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.data
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    /// Read a raw blob
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Whether `key` currently holds a blob
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.raw(key).is_some()
    }

    /// Make every subsequent `save`/`remove` fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of stored keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether the repository is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_writable(&self) -> Result<(), RepositoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }
}

impl StateRepository for InMemoryRepository {
    fn load(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        Ok(self.raw(key))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        self.check_writable()?;
        self.insert_raw(key, value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), RepositoryError> {
        self.check_writable()?;
        self.data
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}
