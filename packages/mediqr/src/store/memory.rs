use super::Store;
use crate::error::StoreError;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Process-local store. Contents vanish with the process.
///
/// An optional quota caps the size of any single blob, the way browser storage
/// rejects writes once its quota is exhausted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        MemoryStore {
            blobs: Mutex::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys = self.blobs().keys().cloned().collect::<Vec<_>>();
        keys.sort();
        keys
    }

    // Every write is a single insert or remove, so a poisoned map is still consistent
    fn blobs(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.blobs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Store for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.blobs().get(key).cloned())
    }

    fn save(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            if value.len() > quota {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    size: value.len(),
                    quota,
                });
            }
        }

        self.blobs().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.blobs().remove(key);
        Ok(())
    }

    fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
