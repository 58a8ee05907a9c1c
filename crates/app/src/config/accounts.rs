//! Accounts Config

use std::fmt;

use clap::Args;

/// Admin account created on startup when missing.
#[derive(Args)]
pub struct AdminConfig {
    /// Default admin username
    #[arg(
        long = "default-admin-username",
        env = "EMPORIUM_ADMIN_USERNAME",
        default_value = "Maria"
    )]
    pub username: String,

    /// Default admin password
    #[arg(
        long = "default-admin-password",
        env = "EMPORIUM_ADMIN_PASSWORD",
        default_value = "maria123",
        hide_env_values = true,
        hide_default_value = true
    )]
    password: String,
}

impl AdminConfig {
    /// Default admin password
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminConfig")
            .field("username", &self.username)
            .field("password", &"**redacted**")
            .finish()
    }
}
