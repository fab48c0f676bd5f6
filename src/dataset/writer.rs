//! Streaming JSON Lines output

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};

/// Writes one JSON object per line as records arrive.
///
/// A writer from [`JsonlWriter::create`] writes straight to its path, and
/// records already written stay on disk if a later write fails. A writer from
/// [`JsonlWriter::create_staged`] writes to a `.tmp` sibling that replaces the
/// path only in [`JsonlWriter::finish`].
pub struct JsonlWriter {
    path: PathBuf,
    staging: Option<PathBuf>,
    out: BufWriter<File>,
    written: usize,
}

impl JsonlWriter {
    /// Create (or truncate) `path`, creating its parent directory if needed.
    pub fn create(path: &Path) -> Result<Self> {
        Self::open(path, None)
    }

    /// Like [`JsonlWriter::create`], but `path` is left untouched until
    /// `finish`, so it may also be the file the records are read from.
    pub fn create_staged(path: &Path) -> Result<Self> {
        let mut staging = path.as_os_str().to_owned();
        staging.push(".tmp");
        Self::open(path, Some(PathBuf::from(staging)))
    }

    fn open(path: &Path, staging: Option<PathBuf>) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let target = staging.as_deref().unwrap_or(path);
        let file = File::create(target).map_err(|e| Error::io(target, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            staging,
            out: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<()> {
        let target = self.staging.as_deref().unwrap_or(&self.path);
        serde_json::to_writer(&mut self.out, record).map_err(|e| {
            if e.is_io() {
                Error::io(target, e.into())
            } else {
                Error::Json(e)
            }
        })?;
        self.out
            .write_all(b"\n")
            .map_err(|e| Error::io(target, e))?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and return the output path. A staged file is renamed into place.
    pub fn finish(self) -> Result<PathBuf> {
        let Self {
            path,
            staging,
            mut out,
            ..
        } = self;
        let target = staging.as_deref().unwrap_or(&path);
        out.flush().map_err(|e| Error::io(target, e))?;
        drop(out);
        if let Some(staging) = &staging {
            std::fs::rename(staging, &path).map_err(|e| Error::io(&path, e))?;
        }
        Ok(path)
    }
}
