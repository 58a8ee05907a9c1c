//! Admins

use serde::{Deserialize, Serialize};

use crate::{credentials::Credential, repository::Keyed};

/// Catalog administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    username: String,
    credential: Credential,
}

impl Admin {
    /// Create an admin from a username and a hashed password.
    #[must_use]
    pub fn new(username: impl Into<String>, credential: Credential) -> Self {
        Self {
            username: username.into(),
            credential,
        }
    }

    /// Login name
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Stored password verifier
    pub fn credential(&self) -> &Credential {
        &self.credential
    }
}

impl Keyed for Admin {
    type Key = str;

    fn key(&self) -> &str {
        &self.username
    }
}
