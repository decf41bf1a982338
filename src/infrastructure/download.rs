// SPDX-License-Identifier: MPL-2.0
//! Download sink writing exports into a directory.
//!
//! Files are first written to `<name>.part` and renamed into place, so an
//! interrupted export never leaves a truncated file under the final name.
//! An existing file is never overwritten: `qrcode-1.png` becomes
//! `qrcode-1-1.png`, `qrcode-1-2.png` and so on.

use crate::application::port::DownloadSink;
use crate::error::{Error, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Upper bound on collision suffixes tried before giving up.
const MAX_COLLISION_SUFFIX: u32 = 1000;

#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn available_path(&self, filename: &str) -> Result<PathBuf> {
        let candidate = self.dir.join(filename);
        if !candidate.exists() {
            return Ok(candidate);
        }

        let (stem, extension) = match filename.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
            _ => (filename, None),
        };
        (1..=MAX_COLLISION_SUFFIX)
            .map(|n| match extension {
                Some(ext) => self.dir.join(format!("{stem}-{n}.{ext}")),
                None => self.dir.join(format!("{stem}-{n}")),
            })
            .find(|path| !path.exists())
            .ok_or_else(|| Error::Io(format!("no free file name for {filename}")))
    }
}

impl DownloadSink for DirectorySink {
    fn save(&self, filename: &str, payload: &[u8], mime_type: &str) -> Result<PathBuf> {
        if filename.is_empty() || filename.contains(['/', '\\']) {
            return Err(Error::Io(format!("invalid file name: {filename:?}")));
        }

        fs::create_dir_all(&self.dir)?;
        let target = self.available_path(filename)?;
        let mut part = target.clone().into_os_string();
        part.push(".part");
        let part = PathBuf::from(part);

        let written = write_file(&part, payload).and_then(|()| {
            fs::rename(&part, &target)?;
            Ok(())
        });
        if let Err(error) = written {
            // Best effort: the partial file may not exist.
            let _ = fs::remove_file(&part);
            return Err(error);
        }

        tracing::debug!(path = %target.display(), mime_type, bytes = payload.len(), "saved download");
        Ok(target)
    }
}

fn write_file(path: &Path, payload: &[u8]) -> Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(payload)?;
    file.sync_all()?;
    Ok(())
}
