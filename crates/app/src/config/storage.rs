//! Storage Config

use std::path::PathBuf;

use clap::Args;

/// Locations of the data files.
///
/// File names are resolved against `data_dir`; absolute file names are used
/// as given.
#[derive(Debug, Args)]
pub struct StorageConfig {
    /// Directory holding the data files
    #[arg(long, env = "EMPORIUM_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Product catalog file
    #[arg(long, env = "EMPORIUM_PRODUCTS_FILE", default_value = "products.json")]
    pub products_file: PathBuf,

    /// Users file
    #[arg(long, env = "EMPORIUM_USERS_FILE", default_value = "users.json")]
    pub users_file: PathBuf,

    /// Admins file
    #[arg(long, env = "EMPORIUM_ADMINS_FILE", default_value = "admins.json")]
    pub admins_file: PathBuf,

    /// Purchase audit log
    #[arg(long, env = "EMPORIUM_PURCHASES_LOG", default_value = "purchases.txt")]
    pub purchases_log: PathBuf,
}

impl StorageConfig {
    /// Path of the product catalog file.
    pub fn products_path(&self) -> PathBuf {
        self.data_dir.join(&self.products_file)
    }

    /// Path of the users file.
    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(&self.users_file)
    }

    /// Path of the admins file.
    pub fn admins_path(&self) -> PathBuf {
        self.data_dir.join(&self.admins_file)
    }

    /// Path of the purchase audit log.
    pub fn purchases_log_path(&self) -> PathBuf {
        self.data_dir.join(&self.purchases_log)
    }
}
