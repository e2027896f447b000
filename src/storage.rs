//! # On-Watch File Storage
//!
//! A tiny flat filesystem for faces that want to persist state across
//! power cycles. Hardware builds back this with a wear-levelled flash
//! filesystem whose directory is flat and whose names are 8.3 style; the
//! host implementation mirrors those limits over a plain directory so the
//! same face code behaves identically in the simulator.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Largest file the storage layer will read or write.
pub const MAX_FILE_SIZE: usize = 8192;

/// Errors from the storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filename failed 8.3 validation.
    #[error("invalid filename {0:?}: expected 8.3-style ASCII name")]
    InvalidFilename(String),
    /// File content exceeds [`MAX_FILE_SIZE`].
    #[error("file too large: {size} bytes exceeds the {max} byte limit")]
    TooLarge { size: usize, max: usize },
    /// Underlying filesystem error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Flat file store rooted at one directory.
#[derive(Debug)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Open (creating if needed) a store rooted at the given directory.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StorageError> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }

    /// Whether a file exists.
    pub fn file_exists(&self, name: &str) -> bool {
        self.path_for(name).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Size of a file in bytes, or `None` if it does not exist.
    pub fn file_size(&self, name: &str) -> Option<u64> {
        let path = self.path_for(name).ok()?;
        fs::metadata(path).ok().map(|m| m.len())
    }

    /// Read a whole file.
    pub fn read(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path_for(name)?;
        let bytes = fs::read(path)?;
        if bytes.len() > MAX_FILE_SIZE {
            return Err(StorageError::TooLarge { size: bytes.len(), max: MAX_FILE_SIZE });
        }
        Ok(bytes)
    }

    /// Read a whole file as UTF-8, replacing invalid bytes.
    pub fn read_string(&self, name: &str) -> Result<String, StorageError> {
        Ok(String::from_utf8_lossy(&self.read(name)?).into_owned())
    }

    /// Write a whole file, replacing any previous content.
    pub fn write(&self, name: &str, contents: &[u8]) -> Result<(), StorageError> {
        if contents.len() > MAX_FILE_SIZE {
            return Err(StorageError::TooLarge { size: contents.len(), max: MAX_FILE_SIZE });
        }
        let path = self.path_for(name)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Append to a file, creating it if absent. The combined size must stay
    /// under the limit.
    pub fn append(&self, name: &str, contents: &[u8]) -> Result<(), StorageError> {
        let existing = self.file_size(name).unwrap_or(0) as usize;
        let size = existing + contents.len();
        if size > MAX_FILE_SIZE {
            return Err(StorageError::TooLarge { size, max: MAX_FILE_SIZE });
        }
        let path = self.path_for(name)?;
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(contents)?;
        Ok(())
    }

    /// Delete a file. Deleting a missing file succeeds.
    pub fn remove(&self, name: &str) -> Result<(), StorageError> {
        let path = self.path_for(name)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Names of all files in the store, sorted.
    pub fn list(&self) -> Result<Vec<String>, StorageError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.path().is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

/// An 8.3-style name: 1-8 character stem, optional 1-3 character extension,
/// ASCII alphanumerics plus underscore and dash, no path separators.
fn validate_name(name: &str) -> Result<(), StorageError> {
    let invalid = || StorageError::InvalidFilename(name.to_string());
    let mut parts = name.split('.');
    let stem = parts.next().ok_or_else(invalid)?;
    let ext = parts.next();
    if parts.next().is_some() {
        return Err(invalid());
    }
    let ok_part = |part: &str, max: usize| {
        !part.is_empty()
            && part.len() <= max
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    };
    if !ok_part(stem, 8) {
        return Err(invalid());
    }
    if let Some(ext) = ext {
        if !ok_part(ext, 3) {
            return Err(invalid());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store() -> (tempfile::TempDir, Storage) {
        let dir = tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        (dir, storage)
    }

    #[test]
    fn write_read_round_trip() {
        let (_dir, storage) = store();
        storage.write("state.dat", b"hello").unwrap();
        assert!(storage.file_exists("state.dat"));
        assert_eq!(storage.file_size("state.dat"), Some(5));
        assert_eq!(storage.read("state.dat").unwrap(), b"hello");
    }

    #[test]
    fn append_extends_the_file() {
        let (_dir, storage) = store();
        storage.append("log.txt", b"ab").unwrap();
        storage.append("log.txt", b"cd").unwrap();
        assert_eq!(storage.read_string("log.txt").unwrap(), "abcd");
    }

    #[test]
    fn remove_is_idempotent() {
        let (_dir, storage) = store();
        storage.write("gone.dat", b"x").unwrap();
        storage.remove("gone.dat").unwrap();
        storage.remove("gone.dat").unwrap();
        assert!(!storage.file_exists("gone.dat"));
    }

    #[test]
    fn list_is_sorted() {
        let (_dir, storage) = store();
        storage.write("b.dat", b"").unwrap();
        storage.write("a.dat", b"").unwrap();
        assert_eq!(storage.list().unwrap(), vec!["a.dat", "b.dat"]);
    }

    #[test]
    fn filenames_are_validated() {
        let (_dir, storage) = store();
        for bad in ["", "toolongname.dat", "a.long", "a/b.dat", "a.b.c", "café.dat"] {
            assert!(
                matches!(storage.write(bad, b""), Err(StorageError::InvalidFilename(_))),
                "{bad:?} should be rejected"
            );
        }
        for good in ["a", "state.dat", "my_file.txt", "UP-8.bin"] {
            assert!(storage.write(good, b"").is_ok(), "{good:?} should be accepted");
        }
    }

    #[test]
    fn size_limit_is_enforced() {
        let (_dir, storage) = store();
        let big = vec![0u8; MAX_FILE_SIZE + 1];
        assert!(matches!(
            storage.write("big.dat", &big),
            Err(StorageError::TooLarge { .. })
        ));
        storage.write("ok.dat", &big[..MAX_FILE_SIZE]).unwrap();
        assert!(matches!(
            storage.append("ok.dat", b"x"),
            Err(StorageError::TooLarge { .. })
        ));
    }
}
