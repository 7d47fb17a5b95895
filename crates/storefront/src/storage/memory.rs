//! In-memory slot.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::{DurableSlot, StorageError};

/// A durable slot backed by a shared map.
///
/// Clones share the same map, so a test can keep a handle and inspect what a
/// cart wrote, or open a second cart over the same "storage".
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no key has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DurableSlot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_key() {
        let slot = MemorySlot::new();
        assert_eq!(slot.read("cart-storage").unwrap(), None);
    }

    #[test]
    fn test_clones_share_entries() {
        let slot = MemorySlot::new();
        let other = slot.clone();
        slot.write("k", "v").unwrap();
        assert_eq!(other.read("k").unwrap().as_deref(), Some("v"));
        assert_eq!(slot.len(), 1);
    }
}
