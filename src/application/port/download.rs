// SPDX-License-Identifier: MPL-2.0
//! File delivery port definition.
//!
//! Exported images are handed to a [`DownloadSink`], the equivalent of a
//! browser "save file" action. A sink either stores the complete payload or
//! fails without leaving anything behind.

use crate::error::Result;
use std::path::PathBuf;

/// Port for delivering an exported file to the user.
pub trait DownloadSink: Send + Sync {
    /// Saves `payload` under `filename` and returns where it ended up.
    ///
    /// The sink may adjust the name to avoid overwriting an existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file could not be written in full.
    fn save(&self, filename: &str, payload: &[u8], mime_type: &str) -> Result<PathBuf>;
}
