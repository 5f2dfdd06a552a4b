mod api;
mod log;
mod mediqr;
mod qr;
mod store;

pub use api::ApiConfig;
pub use log::{LogConfig, LogFormat, LogLevel, LogOutput};
pub use mediqr::MediqrConfig;
pub use qr::QrConfig;
pub use store::{StoreBackend, StoreConfig};

pub const MEDIQR_PREFIX: &str = "MEDIQR";
pub const DEFAULT_CONFIG_FILE_PATH: &str = "mediqr.toml";

pub const DEFAULT_LATENCY_MS: u64 = 500;
pub const DEFAULT_QR_ENDPOINT: &str = "https://api.qrserver.com/v1/read-qr-code/";
pub const DEFAULT_QR_CREATE_ENDPOINT: &str = "https://api.qrserver.com/v1/create-qr-code/";
pub const DEFAULT_QR_CARD_SIZE: u32 = 200;
pub const DEFAULT_QR_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_STORE_PATH: &str = "mediqr-data";
