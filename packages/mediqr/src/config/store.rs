use super::DEFAULT_STORE_PATH;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Clone, Debug, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "StoreConfig::default_backend")]
    pub backend: StoreBackend,

    #[serde(default = "StoreConfig::default_path")]
    pub path: String,

    /// Largest blob the memory backend accepts, in bytes.
    /// Unset means unlimited.
    pub quota_bytes: Option<usize>,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[serde(alias = "Memory", alias = "MEMORY")]
    Memory,
    #[serde(alias = "Sled", alias = "SLED")]
    Sled,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            backend: StoreConfig::default_backend(),
            path: StoreConfig::default_path(),
            quota_bytes: None,
        }
    }
}

impl StoreConfig {
    pub const fn default_backend() -> StoreBackend {
        StoreBackend::Sled
    }

    pub fn default_path() -> String {
        DEFAULT_STORE_PATH.to_string()
    }

    pub fn path(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }
}
