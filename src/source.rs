//! Source file loading
//!
//! Files are read as raw bytes and decoded permissively: invalid UTF-8
//! sequences become U+FFFD instead of failing the read.

use std::io;
use std::path::PathBuf;

use crate::walker::WalkedFile;

/// A file loaded for one pipeline pass. Not cached across stages.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub relative: PathBuf,
    pub content: String,
}

impl SourceFile {
    /// Read a walked file, skipping it if larger than `max_size`.
    ///
    /// An oversized file is reported as an `InvalidData` error so callers can
    /// treat it like any other unreadable file.
    pub fn read(file: &WalkedFile, max_size: Option<u64>) -> io::Result<Self> {
        if let Some(limit) = max_size {
            let len = file.path.metadata()?.len();
            if len > limit {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("file is {} bytes, limit is {}", len, limit),
                ));
            }
        }

        let bytes = std::fs::read(&file.path)?;
        Ok(Self {
            path: file.path.clone(),
            relative: file.relative.clone(),
            content: decode_lossy(bytes),
        })
    }
}

/// Decode bytes as UTF-8, replacing invalid sequences. A leading BOM is dropped.
pub fn decode_lossy(bytes: Vec<u8>) -> String {
    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    };
    match text.strip_prefix('\u{FEFF}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}
