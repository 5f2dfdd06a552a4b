use super::Store;
use crate::error::StoreError;
use crate::log::STORE;
use sled::{Db, Tree};
use std::path::Path;
use tracing::debug;

const TREE_NAME: &str = "mediqr";

/// Store backed by an embedded sled database, so collections survive restarts.
#[derive(Debug)]
pub struct SledStore {
    db: Db,
    tree: Tree,
}

impl SledStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        let tree = db.open_tree(TREE_NAME)?;
        Ok(SledStore { db, tree })
    }

    /// A store that is deleted when dropped
    pub fn temporary() -> Result<Self, StoreError> {
        let db = sled::Config::new().temporary(true).open()?;
        let tree = db.open_tree(TREE_NAME)?;
        Ok(SledStore { db, tree })
    }
}

impl Store for SledStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let value = self.tree.get(key)?;
        Ok(value.map(|ivec| ivec.to_vec()))
    }

    fn save(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.tree.insert(key, value)?;
        debug!(target: STORE, msg = "Saved", key, bytes = value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.tree.remove(key)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), StoreError> {
        let bytes = self.db.flush()?;
        debug!(target: STORE, msg = "Flushed", bytes);
        Ok(())
    }
}
