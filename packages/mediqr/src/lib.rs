pub mod api;
pub mod cli;
pub mod clock;
pub mod config;
pub mod database;
pub mod error;
pub mod log;
pub mod model;
pub mod qr;
pub mod services;
pub mod session;
pub mod store;

pub use crate::api::Api;
pub use crate::cli::Args;
pub use crate::config::MediqrConfig;
pub use crate::database::Database;
pub use crate::log::init;
pub use crate::services::RecordsService;
pub use crate::session::Session;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
pub mod test_helpers;
