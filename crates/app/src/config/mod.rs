//! Application configuration

use clap::Parser;

use crate::config::{accounts::AdminConfig, observability::LoggingConfig, storage::StorageConfig};

pub mod accounts;
pub mod observability;
pub mod storage;

/// Emporium configuration
#[derive(Debug, Parser)]
#[command(name = "emporium", about = "Emporium console shopping cart", long_about = None)]
pub struct AppConfig {
    /// Data file locations.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Default admin account.
    #[command(flatten)]
    pub admin: AdminConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
