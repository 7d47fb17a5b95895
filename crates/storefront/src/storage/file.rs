//! File-backed slot.

use std::fs;
use std::io::{ErrorKind, Write as _};
use std::path::PathBuf;

use tracing::trace;

use super::{DurableSlot, StorageError};

/// A durable slot storing each key as `<dir>/<key>.json`.
///
/// Writes land in a uniquely named temporary file in the same directory and
/// are renamed into place, so a reader never sees a half-written value and
/// concurrent writers never share a temporary file. The last rename wins.
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    /// Create a slot rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The file a key is stored in.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] unless the key is non-empty and
    /// made only of ASCII letters, digits, `-` and `_`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl DurableSlot for FileSlot {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{key}."))
            .suffix(".tmp")
            .tempfile_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;

        trace!(path = %path.display(), bytes = value.len(), "slot written");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSlot::new(dir.path().join("nested"));

        slot.write("cart-storage", "{\"items\":[]}").unwrap();
        assert_eq!(
            slot.read("cart-storage").unwrap().as_deref(),
            Some("{\"items\":[]}")
        );
        assert!(dir.path().join("nested/cart-storage.json").exists());
    }

    #[test]
    fn test_read_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSlot::new(dir.path());
        assert_eq!(slot.read("cart-storage").unwrap(), None);
    }

    #[test]
    fn test_overwrite_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSlot::new(dir.path());
        slot.write("cart-storage", "one").unwrap();
        slot.write("cart-storage", "two").unwrap();

        assert_eq!(slot.read("cart-storage").unwrap().as_deref(), Some("two"));
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, ["cart-storage.json"]);
    }

    #[test]
    fn test_concurrent_writers_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let slot = Arc::new(FileSlot::new(dir.path()));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let slot = Arc::clone(&slot);
                thread::spawn(move || {
                    for round in 0..20 {
                        slot.write("cart-storage", &format!("writer {i} round {round}"))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let value = slot.read("cart-storage").unwrap().unwrap();
        assert!(value.starts_with("writer "), "{value}");
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let slot = FileSlot::new("/tmp");
        assert!(matches!(
            slot.path_for("../etc/passwd"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(slot.path_for(""), Err(StorageError::InvalidKey(_))));
    }
}
