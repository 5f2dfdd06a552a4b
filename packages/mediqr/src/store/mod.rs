//! Durable byte-level storage of independently keyed blobs.
//!
//! The [`Database`](crate::database::Database) serializes each collection to JSON and hands the
//! bytes to a [`Store`]. Absence of a key is a normal outcome on first run.

mod memory;
mod sled_store;

pub use memory::MemoryStore;
pub use sled_store::SledStore;

use crate::config::{StoreBackend, StoreConfig};
use crate::error::{Error, StoreError};
use crate::log::STORE;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::info;

pub const PATIENTS_KEY: &str = "hospital_erp_patients";
pub const RECORDS_KEY: &str = "hospital_erp_records";
pub const APPOINTMENTS_KEY: &str = "hospital_erp_appointments";
pub const USER_KEY: &str = "hospital_erp_user";

pub trait Store: Send + Sync + Debug {
    /// Returns `Ok(None)` if the key has never been written
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    fn save(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Returns `Ok(())` even if the key did not exist
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    fn flush(&self) -> Result<(), StoreError>;
}

///
/// Open the store selected by configuration
///
pub fn open(config: &StoreConfig) -> Result<Arc<dyn Store>, Error> {
    let store: Arc<dyn Store> = match config.backend {
        StoreBackend::Memory => {
            info!(target: STORE, msg = "Using in-memory store", quota_bytes = ?config.quota_bytes);
            match config.quota_bytes {
                Some(quota) => Arc::new(MemoryStore::with_quota(quota)),
                None => Arc::new(MemoryStore::new()),
            }
        }
        StoreBackend::Sled => {
            info!(target: STORE, msg = "Opening store", path = config.path);
            Arc::new(SledStore::open(config.path())?)
        }
    };

    Ok(store)
}
