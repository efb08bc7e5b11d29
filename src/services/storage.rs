use crate::models::Identity;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// Fixed key under which the identity record is persisted
pub const IDENTITY_KEY: &str = "auth.user";

/// Errors that can occur with identity storage
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt identity record: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Durable slot for the single identity record the client owns
///
/// The record lives under the fixed [`IDENTITY_KEY`], serialized as JSON.
pub trait IdentityStore: Send + Sync {
    /// Read the persisted identity, if any
    fn load(&self) -> Result<Option<Identity>, StoreError>;

    /// Persist the identity, replacing any previous record
    fn save(&self, identity: &Identity) -> Result<(), StoreError>;

    /// Remove the persisted identity
    fn clear(&self) -> Result<(), StoreError>;
}

/// Identity store backed by a JSON file on disk
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at the given state directory
    ///
    /// The directory is created on first save, not here.
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self {
            path: state_dir.as_ref().join(format!("{}.json", IDENTITY_KEY)),
        }
    }
}

impl IdentityStore for JsonFileStore {
    fn load(&self) -> Result<Option<Identity>, StoreError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let identity = serde_json::from_str(&json)?;
        Ok(Some(identity))
    }

    fn save(&self, identity: &Identity) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string(identity)?;
        fs::write(&self.path, json)?;

        tracing::debug!("Persisted identity to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory identity store for tests and embedders without a disk
#[derive(Default)]
pub struct MemoryStore {
    slot: Mutex<Option<Identity>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityStore for MemoryStore {
    fn load(&self) -> Result<Option<Identity>, StoreError> {
        Ok(self.slot.lock().expect("identity slot poisoned").clone())
    }

    fn save(&self, identity: &Identity) -> Result<(), StoreError> {
        *self.slot.lock().expect("identity slot poisoned") = Some(identity.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot.lock().expect("identity slot poisoned") = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());

        let identity = Identity {
            name: "Test".to_string(),
            email: "example@example.com".to_string(),
        };
        store.save(&identity).unwrap();
        assert_eq!(store.load().unwrap(), Some(identity));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_missing_file_is_absent() {
        let store = JsonFileStore::new(std::env::temp_dir().join("shelter-match-nonexistent"));
        assert!(store.load().unwrap().is_none());
        // Clearing an absent record is not an error
        store.clear().unwrap();
    }
}
