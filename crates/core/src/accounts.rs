//! Accounts
//!
//! Registration and login for users and admins. Both directories live in
//! [`RecordSet`]s keyed by username; passwords go through a
//! [`PasswordHasher`] and only the resulting
//! [`Credential`](crate::credentials::Credential) is kept.

use thiserror::Error;
use tracing::info;

use crate::{
    admins::Admin,
    credentials::{PasswordHasher, Sha256Hasher},
    repository::{RecordSet, Repository, RepositoryError},
    users::{NewUser, User},
};

/// Errors raised by account operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountError {
    /// Another account already uses the username.
    #[error("username {0} is already taken")]
    UsernameTaken(String),

    /// Usernames cannot be blank.
    #[error("username cannot be empty")]
    InvalidUsername,

    /// Unknown username or wrong password.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// No account has the given username.
    #[error("account {0} not found")]
    NotFound(String),
}

impl From<RepositoryError> for AccountError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::AlreadyExists(username) => Self::UsernameTaken(username),
            RepositoryError::NotFound(username) => Self::NotFound(username),
        }
    }
}

/// User and admin directories.
#[derive(Debug, Clone, Default)]
pub struct Accounts<H = Sha256Hasher> {
    users: RecordSet<User>,
    admins: RecordSet<Admin>,
    hasher: H,
}

impl<H: PasswordHasher> Accounts<H> {
    /// Create empty directories.
    pub fn new(hasher: H) -> Self {
        Self {
            users: RecordSet::new(),
            admins: RecordSet::new(),
            hasher,
        }
    }

    /// Create directories from stored records.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::UsernameTaken`] if two users or two admins
    /// share a username.
    pub fn with_records(
        hasher: H,
        users: impl IntoIterator<Item = User>,
        admins: impl IntoIterator<Item = Admin>,
    ) -> Result<Self, AccountError> {
        Ok(Self {
            users: RecordSet::from_records(users)?,
            admins: RecordSet::from_records(admins)?,
            hasher,
        })
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// - [`AccountError::InvalidUsername`]: the username is blank.
    /// - [`AccountError::UsernameTaken`]: a user with that name exists.
    pub fn register(&mut self, user: NewUser, password: &str) -> Result<&User, AccountError> {
        if user.username.trim().is_empty() {
            return Err(AccountError::InvalidUsername);
        }

        if self.users.get(user.username.as_str()).is_some() {
            return Err(AccountError::UsernameTaken(user.username));
        }

        let credential = self.hasher.hash(password);
        let registered = self.users.add(User::new(user, credential))?;

        info!(user = %registered.username(), "registered user");

        Ok(registered)
    }

    /// Check a user's password.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidCredentials`] for an unknown username
    /// or a wrong password.
    pub fn authenticate_user(&self, username: &str, password: &str) -> Result<&User, AccountError> {
        self.users
            .get(username)
            .filter(|user| self.hasher.verify(password, user.credential()))
            .ok_or(AccountError::InvalidCredentials)
    }

    /// Check an admin's password.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidCredentials`] for an unknown username
    /// or a wrong password.
    pub fn authenticate_admin(
        &self,
        username: &str,
        password: &str,
    ) -> Result<&Admin, AccountError> {
        self.admins
            .get(username)
            .filter(|admin| self.hasher.verify(password, admin.credential()))
            .ok_or(AccountError::InvalidCredentials)
    }

    /// Create the admin account if no admin has that username.
    ///
    /// Returns whether an admin was created. An existing admin keeps its
    /// current password.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidUsername`] if the username is blank.
    pub fn ensure_admin(&mut self, username: &str, password: &str) -> Result<bool, AccountError> {
        if username.trim().is_empty() {
            return Err(AccountError::InvalidUsername);
        }

        if self.admins.get(username).is_some() {
            return Ok(false);
        }

        let credential = self.hasher.hash(password);

        self.admins.add(Admin::new(username, credential))?;

        info!(admin = %username, "created default admin");

        Ok(true)
    }

    /// Look up a user.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::NotFound`] if no user has that username.
    pub fn user(&self, username: &str) -> Result<&User, AccountError> {
        self.users
            .get(username)
            .ok_or_else(|| AccountError::NotFound(username.to_string()))
    }

    /// Look up a user, mutably.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::NotFound`] if no user has that username.
    pub fn user_mut(&mut self, username: &str) -> Result<&mut User, AccountError> {
        self.users
            .get_mut(username)
            .ok_or_else(|| AccountError::NotFound(username.to_string()))
    }

    /// Every user, in registration order.
    pub fn users(&self) -> &[User] {
        self.users.list()
    }

    /// Every user, mutably.
    pub fn users_mut(&mut self) -> impl Iterator<Item = &mut User> {
        self.users.iter_mut()
    }

    /// Every admin, in creation order.
    pub fn admins(&self) -> &[Admin] {
        self.admins.list()
    }
}
