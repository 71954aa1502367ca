//! Persistent key-value storage for small scalars.
//!
//! One JSON file per key under the platform data directory. Reads are
//! tolerant: a missing or malformed file behaves as if the key were
//! absent, so a damaged store can never fail a caller.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Result, anyhow};
use directories::ProjectDirs;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::StorageError;

#[derive(Debug, Clone)]
pub struct KvStore {
    dir: PathBuf,
}

impl KvStore {
    /// Open the store at the platform data directory.
    pub fn open_default() -> Result<Self> {
        let dirs = ProjectDirs::from("dev", "weatherdash", "weatherdash")
            .ok_or_else(|| anyhow!("Could not determine platform data directory"))?;

        Ok(Self::open_at(dirs.data_dir()))
    }

    /// Open the store at an explicit directory.
    pub fn open_at(dir: impl AsRef<Path>) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    /// Read and deserialize the value under `key`. Returns `None` when
    /// the key is absent or its content does not deserialize.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.key_path(key);
        let contents = fs::read_to_string(&path).ok()?;

        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key, %err, "ignoring malformed stored value");
                None
            }
        }
    }

    /// Serialize and write the value under `key`, creating the storage
    /// directory as needed.
    pub fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;

        let json = serde_json::to_string(value)?;
        fs::write(self.key_path(key), json)?;

        Ok(())
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}
