//! Durable key-value slots.
//!
//! A [`DurableSlot`] is the only storage the cart talks to: a string value
//! under a string key that survives process restarts. Two implementations
//! ship with the crate:
//!
//! - [`FileSlot`] - one JSON file per key inside a directory
//! - [`MemorySlot`] - a shared in-memory map for tests and ephemeral sessions

mod file;
mod memory;

pub use file::FileSlot;
pub use memory::MemorySlot;

use thiserror::Error;

/// Errors raised by a durable slot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The key cannot be mapped onto the backing medium.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// The value could not be encoded for storage.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A persistent string slot addressed by key.
///
/// Calls are synchronous and complete before returning.
pub trait DurableSlot {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing has been written yet.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing medium cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing medium cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: DurableSlot + ?Sized> DurableSlot for Box<T> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}
