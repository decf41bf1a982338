// SPDX-License-Identifier: MPL-2.0
//! Key-value stores for session preferences.
//!
//! [`MemoryStore`] keeps values for the lifetime of the process.
//! [`FileStore`] mirrors them into a CBOR file in the app data directory so
//! they survive restarts. The file is small and rewritten on every change.
//!
//! # Path Resolution
//!
//! 1. Explicit directory passed to [`FileStore::open_in`]
//! 2. `QRX_DATA_DIR` environment variable
//! 3. Platform-specific data directory

use crate::app::paths;
use crate::application::port::KeyValueStore;
use crate::error::{Error, Result};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// State file name within the app data directory.
const STATE_FILE: &str = "state.cbor";

// =============================================================================
// MemoryStore
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// =============================================================================
// FileStore
// =============================================================================

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens the store in the default data directory.
    ///
    /// Returns the store and an optional warning when the existing file could
    /// not be read; the store then starts empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] when no data directory can be resolved.
    pub fn open() -> Result<(Self, Option<String>)> {
        Self::open_in(None)
    }

    /// Opens the store in `base_dir`, or the default data directory if `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] when no data directory can be resolved.
    pub fn open_in(base_dir: Option<PathBuf>) -> Result<(Self, Option<String>)> {
        let mut path = paths::get_app_data_dir_with_override(base_dir)
            .ok_or_else(|| Error::Persistence("no data directory available".into()))?;
        path.push(STATE_FILE);
        Ok(Self::open_file(path))
    }

    /// Opens the store backed by the file at `path`.
    #[must_use]
    pub fn open_file(path: PathBuf) -> (Self, Option<String>) {
        let (values, warning) = match read_values(&path) {
            Ok(values) => (values, None),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "ignoring unreadable state file");
                (BTreeMap::new(), Some(error.to_string()))
            }
        };
        let store = Self {
            path,
            values: Mutex::new(values),
        };
        (store, warning)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        write_values(&self.path, &values)
    }
}

fn read_values(path: &Path) -> Result<BTreeMap<String, String>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let reader = BufReader::new(fs::File::open(path)?);
    ciborium::from_reader(reader).map_err(|e| Error::Persistence(e.to_string()))
}

fn write_values(path: &Path, values: &BTreeMap<String, String>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(fs::File::create(path)?);
    ciborium::into_writer(values, &mut writer).map_err(|e| Error::Persistence(e.to_string()))?;
    writer.flush()?;
    Ok(())
}
