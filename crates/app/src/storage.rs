//! Storage
//!
//! Each entity collection lives in its own [`Store`]. Stores are independent:
//! there is no transaction spanning products, users and admins.

use std::{
    cell::RefCell,
    fmt,
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write},
    marker::PhantomData,
    path::{Path, PathBuf},
    rc::Rc,
};

use emporium::{admins::Admin, products::Product, users::User};
use mockall::automock;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::debug;

use crate::config::storage::StorageConfig;

/// Errors raised by stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File being read
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// The backing file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// File being written
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// The file content is not valid JSON for the stored records.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// File being parsed
        path: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },

    /// The records could not be encoded.
    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        /// File being written
        path: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },

    /// The in-memory store could not be accessed.
    #[error("memory store is already in use")]
    Busy,
}

/// Persistent collection of records.
#[automock]
pub trait Store<T: 'static> {
    /// Read every record.
    ///
    /// Returns `None` if nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the records cannot be read or decoded.
    fn load(&self) -> Result<Option<Vec<T>>, StoreError>;

    /// Replace the stored records.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the records cannot be encoded or written.
    fn save(&self, records: &[T]) -> Result<(), StoreError>;
}

/// Store backed by a pretty-printed JSON array on disk.
pub struct JsonFileStore<T> {
    path: PathBuf,
    records: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    /// Create a store for `path`. Nothing is touched until the first call.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: PhantomData,
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T> fmt::Debug for JsonFileStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonFileStore")
            .field("path", &self.path)
            .finish()
    }
}

impl<T: Serialize + DeserializeOwned + 'static> Store<T> for JsonFileStore<T> {
    fn load(&self) -> Result<Option<Vec<T>>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stored records");

                return Ok(None);
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let records: Vec<T> =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;

        debug!(path = %self.path.display(), count = records.len(), "loaded records");

        Ok(Some(records))
    }

    fn save(&self, records: &[T]) -> Result<(), StoreError> {
        let write_error = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_error)?;
        }

        let mut writer = BufWriter::new(File::create(&self.path).map_err(write_error)?);

        serde_json::to_writer_pretty(&mut writer, records).map_err(|source| {
            StoreError::Encode {
                path: self.path.clone(),
                source,
            }
        })?;

        writer.flush().map_err(write_error)?;

        debug!(path = %self.path.display(), count = records.len(), "saved records");

        Ok(())
    }
}

/// In-memory store. Clones share the same records.
#[derive(Debug)]
pub struct MemoryStore<T> {
    records: Rc<RefCell<Option<Vec<T>>>>,
}

impl<T> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            records: Rc::clone(&self.records),
        }
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            records: Rc::new(RefCell::new(None)),
        }
    }
}

impl<T: Clone> MemoryStore<T> {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `records`.
    #[must_use]
    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: Rc::new(RefCell::new(Some(records))),
        }
    }

    /// Copy of the stored records, if any.
    pub fn snapshot(&self) -> Option<Vec<T>> {
        self.records.try_borrow().ok().and_then(|records| records.clone())
    }
}

impl<T: Clone + 'static> Store<T> for MemoryStore<T> {
    fn load(&self) -> Result<Option<Vec<T>>, StoreError> {
        let records = self.records.try_borrow().map_err(|_err| StoreError::Busy)?;

        Ok(records.clone())
    }

    fn save(&self, records: &[T]) -> Result<(), StoreError> {
        let mut stored = self
            .records
            .try_borrow_mut()
            .map_err(|_err| StoreError::Busy)?;

        *stored = Some(records.to_vec());

        Ok(())
    }
}

/// The three entity stores used by the shop.
pub struct Stores {
    /// Product catalog, tombstones included
    pub products: Box<dyn Store<Product>>,

    /// Users with their carts and histories
    pub users: Box<dyn Store<User>>,

    /// Admins
    pub admins: Box<dyn Store<Admin>>,
}

impl Stores {
    /// JSON file stores at the configured locations.
    pub fn json(config: &StorageConfig) -> Self {
        Self {
            products: Box::new(JsonFileStore::new(config.products_path())),
            users: Box::new(JsonFileStore::new(config.users_path())),
            admins: Box::new(JsonFileStore::new(config.admins_path())),
        }
    }

    /// JSON file stores under `dir` with the default file names.
    pub fn json_in(dir: &Path) -> Self {
        Self {
            products: Box::new(JsonFileStore::new(dir.join("products.json"))),
            users: Box::new(JsonFileStore::new(dir.join("users.json"))),
            admins: Box::new(JsonFileStore::new(dir.join("admins.json"))),
        }
    }
}

impl fmt::Debug for Stores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}
