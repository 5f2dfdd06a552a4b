use super::{
    DEFAULT_QR_CARD_SIZE, DEFAULT_QR_CREATE_ENDPOINT, DEFAULT_QR_ENDPOINT, DEFAULT_QR_TIMEOUT_MS,
};
use serde::Deserialize;
use std::time::Duration;

#[derive(Clone, Debug, Deserialize)]
pub struct QrConfig {
    #[serde(default = "QrConfig::default_endpoint")]
    pub endpoint: String,

    #[serde(default = "QrConfig::default_timeout_ms")]
    pub timeout_ms: u64,

    /// Service that renders a payload as a QR code image
    #[serde(default = "QrConfig::default_create_endpoint")]
    pub create_endpoint: String,

    /// Edge length in pixels of a patient card's QR code
    #[serde(default = "QrConfig::default_card_size")]
    pub card_size: u32,
}

impl Default for QrConfig {
    fn default() -> Self {
        QrConfig {
            endpoint: QrConfig::default_endpoint(),
            timeout_ms: QrConfig::default_timeout_ms(),
            create_endpoint: QrConfig::default_create_endpoint(),
            card_size: QrConfig::default_card_size(),
        }
    }
}

impl QrConfig {
    pub fn default_endpoint() -> String {
        DEFAULT_QR_ENDPOINT.to_string()
    }

    pub const fn default_timeout_ms() -> u64 {
        DEFAULT_QR_TIMEOUT_MS
    }

    pub fn default_create_endpoint() -> String {
        DEFAULT_QR_CREATE_ENDPOINT.to_string()
    }

    pub const fn default_card_size() -> u32 {
        DEFAULT_QR_CARD_SIZE
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
