//! Filesystem blob backend

use super::error::StoreError;
use super::traits::BlobBackend;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Blobs stored as plain files in a single directory
#[derive(Debug, Clone)]
pub struct FsBlobBackend {
    root: PathBuf,
}

impl FsBlobBackend {
    /// Open (creating if needed) a blob directory
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StoreError::io(&root, e))?;
        Ok(Self { root })
    }
}

/// Reject names that are empty or would leave the directory they are joined to
pub(crate) fn validate_name(name: &str) -> Result<(), StoreError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');
    if bad {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn sibling(location: &Path, new_name: &str) -> PathBuf {
    location
        .parent()
        .map_or_else(|| PathBuf::from(new_name), |dir| dir.join(new_name))
}

impl BlobBackend for FsBlobBackend {
    fn root(&self) -> &Path {
        &self.root
    }

    fn write(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, StoreError> {
        validate_name(name)?;
        let dest = self.root.join(name);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&dest) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Err(StoreError::AlreadyExists(dest)),
            Err(e) => return Err(StoreError::io(&dest, e)),
        };
        file.write_all(bytes).map_err(|e| StoreError::io(&dest, e))?;
        Ok(dest)
    }

    fn import(&self, source: &Path) -> Result<PathBuf, StoreError> {
        let name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StoreError::InvalidName(source.display().to_string()))?;
        validate_name(name)?;
        let dest = self.root.join(name);
        if dest.exists() {
            return Err(StoreError::AlreadyExists(dest));
        }
        fs::copy(source, &dest).map_err(|e| StoreError::io(source, e))?;
        Ok(dest)
    }

    fn exists(&self, location: &Path) -> bool {
        location.is_file()
    }

    fn remove(&self, location: &Path) -> Result<(), StoreError> {
        match fs::remove_file(location) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(location, e)),
        }
    }

    fn rename(&self, location: &Path, new_name: &str) -> Result<PathBuf, StoreError> {
        validate_name(new_name)?;
        let dest = sibling(location, new_name);
        if dest == location {
            return Ok(dest);
        }
        if dest.exists() {
            return Err(StoreError::AlreadyExists(dest));
        }
        fs::rename(location, &dest).map_err(|e| StoreError::io(location, e))?;
        tracing::debug!(from = %location.display(), to = %dest.display(), "renamed blob");
        Ok(dest)
    }

    fn copy(&self, location: &Path, new_name: &str) -> Result<PathBuf, StoreError> {
        validate_name(new_name)?;
        let dest = sibling(location, new_name);
        if dest.exists() {
            return Err(StoreError::AlreadyExists(dest));
        }
        fs::copy(location, &dest).map_err(|e| StoreError::io(location, e))?;
        Ok(dest)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let entries = fs::read_dir(&self.root).map_err(|e| StoreError::io(&self.root, e))?;
        for entry in entries {
            let path = entry.map_err(|e| StoreError::io(&self.root, e))?.path();
            let result = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            result.map_err(|e| StoreError::io(&path, e))?;
        }
        Ok(())
    }
}
