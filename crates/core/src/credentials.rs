//! Credentials
//!
//! Passwords are never stored. A [`PasswordHasher`] turns them into a salted
//! [`Credential`] and later verifies login attempts against it.

use std::fmt;

use mockall::automock;
use rand::{RngCore, rngs::OsRng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

/// Number of random salt bytes per credential.
pub const SALT_BYTES: usize = 16;

/// Stored password verifier.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    salt: String,
    hash: String,
}

impl Credential {
    /// Build a credential from its stored parts.
    #[must_use]
    pub fn new(salt: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            salt: salt.into(),
            hash: hash.into(),
        }
    }

    /// Hex encoded salt
    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// Hex encoded digest
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(**redacted**)")
    }
}

/// Turns passwords into credentials and checks them.
#[automock]
pub trait PasswordHasher {
    /// Derive a fresh credential for `password`.
    fn hash(&self, password: &str) -> Credential;

    /// Whether `password` matches `credential`.
    fn verify(&self, password: &str, credential: &Credential) -> bool;
}

/// Salted SHA-256 hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl Sha256Hasher {
    fn digest(salt: &str, password: &str) -> String {
        let digest = Sha256::new()
            .chain_update(salt.as_bytes())
            .chain_update(password.as_bytes())
            .finalize();

        format!("{digest:x}")
    }
}

impl PasswordHasher for Sha256Hasher {
    fn hash(&self, password: &str) -> Credential {
        let mut salt = [0_u8; SALT_BYTES];

        OsRng.fill_bytes(&mut salt);

        let salt_hex = encode_hex(&salt);

        salt.zeroize();

        let hash = Self::digest(&salt_hex, password);

        Credential {
            salt: salt_hex,
            hash,
        }
    }

    fn verify(&self, password: &str, credential: &Credential) -> bool {
        let candidate = Self::digest(&credential.salt, password);

        constant_time_eq(candidate.as_bytes(), credential.hash.as_bytes())
    }
}

fn encode_hex(bytes: &[u8]) -> String {
    let mut encoded = String::with_capacity(bytes.len() * 2);

    for byte in bytes {
        encoded.push(nibble(byte >> 4));
        encoded.push(nibble(byte & 0x0f));
    }

    encoded
}

fn nibble(value: u8) -> char {
    char::from_digit(u32::from(value), 16).unwrap_or('0')
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }

    left.iter()
        .zip(right)
        .fold(0_u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}
