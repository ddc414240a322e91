//! Temporary-file backing store.

use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use tempfile::NamedTempFile;

use super::{BackingStore, released_error};

const TEMP_PREFIX: &str = ".blockrs-";

/// A backing store held in a named temporary file.
///
/// The file is deleted exactly once: by [`BackingStore::release`], or on drop
/// if the session ends without releasing it (panic, early return).
#[derive(Debug)]
pub struct TempFileStore {
    file: Option<NamedTempFile>,
}

impl TempFileStore {
    /// Creates a store in the system temporary directory.
    pub fn new() -> io::Result<Self> {
        let file = tempfile::Builder::new().prefix(TEMP_PREFIX).tempfile()?;
        debug!("created backing store {}", file.path().display());
        Ok(Self { file: Some(file) })
    }

    /// Creates a store inside `dir`.
    pub fn new_in(dir: impl AsRef<Path>) -> io::Result<Self> {
        let file = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempfile_in(dir)?;
        debug!("created backing store {}", file.path().display());
        Ok(Self { file: Some(file) })
    }

    /// Returns the file path, or `None` once released.
    pub fn path(&self) -> Option<&Path> {
        self.file.as_ref().map(|f| f.path())
    }

    /// Returns true once the file has been deleted.
    pub fn is_released(&self) -> bool {
        self.file.is_none()
    }

    fn file_mut(&mut self) -> io::Result<&mut NamedTempFile> {
        self.file.as_mut().ok_or_else(released_error)
    }
}

impl BackingStore for TempFileStore {
    fn write_at(&mut self, offset: u64, data: &[u8]) -> io::Result<()> {
        let file = self.file_mut()?;
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(data)
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        let file = self.file_mut()?;
        file.seek(SeekFrom::Start(offset))?;
        loop {
            match file.read(buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => return other,
            }
        }
    }

    fn release(&mut self) -> io::Result<()> {
        let Some(file) = self.file.take() else {
            return Ok(());
        };
        let path: PathBuf = file.path().to_path_buf();
        file.close()?;
        debug!("released backing store {}", path.display());
        Ok(())
    }
}

impl Drop for TempFileStore {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!("failed to delete backing store: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read_at() {
        let mut store = TempFileStore::new().unwrap();
        store.write_at(0, b"hello").unwrap();
        store.write_at(5, b" world").unwrap();

        let mut buf = [0u8; 5];
        let n = store.read_at(6, &mut buf).unwrap();
        assert_eq!(n, 5);
        assert_eq!(&buf, b"world");
    }

    #[test]
    fn test_read_past_end_is_short() {
        let mut store = TempFileStore::new().unwrap();
        store.write_at(0, b"abc").unwrap();

        let mut buf = [0u8; 8];
        assert_eq!(store.read_at(3, &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_release_deletes_file() {
        let mut store = TempFileStore::new().unwrap();
        let path = store.path().unwrap().to_path_buf();
        assert!(path.exists());

        store.release().unwrap();
        assert!(store.is_released());
        assert!(!path.exists());

        // Idempotent
        store.release().unwrap();
    }

    #[test]
    fn test_use_after_release_fails() {
        let mut store = TempFileStore::new().unwrap();
        store.release().unwrap();

        assert!(store.write_at(0, b"x").is_err());
        let mut buf = [0u8; 1];
        assert!(store.read_at(0, &mut buf).is_err());
    }

    #[test]
    fn test_drop_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let store = TempFileStore::new_in(dir.path()).unwrap();
            store.path().unwrap().to_path_buf()
        };
        assert!(!path.exists());
    }
}
