use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::models::{StoreData, StoredEntry};

/// File-backed password store.
///
/// Entries are kept already sealed; the store never sees plaintext.
#[derive(Debug)]
pub struct PasswordStore {
    data_path: PathBuf,
    data: StoreData,
}

impl PasswordStore {
    /// Binds the store to `path`. A missing file yields an empty store that is
    /// written on the first save.
    pub fn bind(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_path = path.into();

        let data = match fs::read(&data_path) {
            Ok(content) => serde_json::from_slice(&content).map_err(|source| StoreError::Format {
                path: data_path.clone(),
                source,
            })?,
            Err(err) if err.kind() == ErrorKind::NotFound => StoreData::new(),
            Err(source) => {
                return Err(StoreError::Io {
                    path: data_path,
                    source,
                })
            }
        };

        Ok(Self { data_path, data })
    }

    pub fn exists(&self) -> bool {
        self.data_path.exists()
    }

    pub fn path(&self) -> &Path {
        &self.data_path
    }

    pub fn handles(&self) -> Vec<String> {
        self.data.handles()
    }

    pub fn get(&self, handle: &str) -> Option<&StoredEntry> {
        self.data.find(handle)
    }

    pub fn put(&mut self, handle: &str, entry: StoredEntry) {
        self.data.upsert(handle, entry);
    }

    pub fn remove(&mut self, handle: &str) -> bool {
        self.data.remove(handle)
    }

    pub fn save(&self) -> Result<(), StoreError> {
        let content = serde_json::to_vec(&self.data).map_err(StoreError::Serialize)?;
        let io_err = |source| StoreError::Io {
            path: self.data_path.clone(),
            source,
        };

        let mut file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.data_path)
            .map_err(io_err)?;

        // Read/write for owner only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(io_err)?;
        }

        file.write_all(&content).map_err(io_err)?;
        Ok(())
    }
}
