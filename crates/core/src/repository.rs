//! Repositories
//!
//! Keyed record collections used as the in-memory source of truth for
//! products, users and admins. Persistence lives behind separate stores, so a
//! repository never touches the file system.

use std::fmt::Display;

use thiserror::Error;

/// A record addressable by a unique key.
pub trait Keyed {
    /// Key type
    type Key: PartialEq + Display + ?Sized;

    /// Returns the key identifying this record.
    fn key(&self) -> &Self::Key;
}

/// Errors returned by repository writes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// A record with the same key already exists.
    #[error("record {0} already exists")]
    AlreadyExists(String),

    /// No record has the given key.
    #[error("record {0} not found")]
    NotFound(String),
}

/// Record storage addressed by key.
pub trait Repository<T: Keyed> {
    /// Retrieve a record by key.
    fn get(&self, key: &T::Key) -> Option<&T>;

    /// Retrieve a record by key, mutably.
    fn get_mut(&mut self, key: &T::Key) -> Option<&mut T>;

    /// All records, in insertion order.
    fn list(&self) -> &[T];

    /// Insert a new record.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::AlreadyExists`] if the key is taken.
    fn add(&mut self, record: T) -> Result<&T, RepositoryError>;

    /// Replace the record with the same key, returning the previous version.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if no record has that key.
    fn update(&mut self, record: T) -> Result<T, RepositoryError>;

    /// Remove and return the record with the given key.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if no record has that key.
    fn remove(&mut self, key: &T::Key) -> Result<T, RepositoryError>;
}

/// Insertion-ordered, vector backed repository.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet<T> {
    records: Vec<T>,
}

impl<T> Default for RecordSet<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<T: Keyed> RecordSet<T> {
    /// Create an empty record set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record set from existing records, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::AlreadyExists`] on the first duplicate key.
    pub fn from_records(records: impl IntoIterator<Item = T>) -> Result<Self, RepositoryError> {
        let mut set = Self::new();

        for record in records {
            set.add(record)?;
        }

        Ok(set)
    }

    /// Iterate over the records, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.records.iter_mut()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the set, returning its records.
    pub fn into_records(self) -> Vec<T> {
        self.records
    }

    fn position(&self, key: &T::Key) -> Option<usize> {
        self.records.iter().position(|record| record.key() == key)
    }
}

impl<T: Keyed> Repository<T> for RecordSet<T> {
    fn get(&self, key: &T::Key) -> Option<&T> {
        self.records.iter().find(|record| record.key() == key)
    }

    fn get_mut(&mut self, key: &T::Key) -> Option<&mut T> {
        self.records.iter_mut().find(|record| record.key() == key)
    }

    fn list(&self) -> &[T] {
        &self.records
    }

    fn add(&mut self, record: T) -> Result<&T, RepositoryError> {
        let key = record.key().to_string();

        if self.position(record.key()).is_some() {
            return Err(RepositoryError::AlreadyExists(key));
        }

        self.records.push(record);

        self.records.last().ok_or(RepositoryError::NotFound(key))
    }

    fn update(&mut self, record: T) -> Result<T, RepositoryError> {
        let slot = self
            .get_mut(record.key())
            .ok_or_else(|| RepositoryError::NotFound(record.key().to_string()))?;

        Ok(std::mem::replace(slot, record))
    }

    fn remove(&mut self, key: &T::Key) -> Result<T, RepositoryError> {
        let index = self
            .position(key)
            .ok_or_else(|| RepositoryError::NotFound(key.to_string()))?;

        Ok(self.records.remove(index))
    }
}
