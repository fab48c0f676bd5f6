//! Record filter: narrows an unprocessed dataset by filename or unit name

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::FilterSpec;
use crate::dataset::JsonlWriter;
use crate::division::Division;
use crate::error::{Error, Result};

/// File name of the dataset written by [`filter_dataset`].
pub const PROCESSED_DATASET_FILE: &str = "processed_dataset.jsonl";

/// Outcome of one record filter run.
#[derive(Debug, Clone, Serialize)]
pub struct RecordFilterReport {
    pub path: PathBuf,
    pub division: Division,
    pub kept: usize,
    pub dropped: usize,
    /// Lines that were not JSON objects
    pub malformed: usize,
}

/// Filter `unprocessed` into `dest_dir/processed_dataset.jsonl`.
///
/// The compared field depends on the division: `filename` for file records,
/// `method.name` for method records, `class.name` for class records. A
/// missing field compares as the empty string. Lines that do not parse as a
/// JSON object are skipped. Kept records keep their key order.
///
/// `unprocessed` may itself be `dest_dir/processed_dataset.jsonl`; it is only
/// replaced once every line has been read.
pub fn filter_dataset(
    unprocessed: &Path,
    division: Division,
    spec: &FilterSpec,
    dest_dir: &Path,
) -> Result<RecordFilterReport> {
    if !division.is_record_filterable() {
        return Err(Error::UnfilterableDivision(division.to_string()));
    }

    let input = File::open(unprocessed).map_err(|e| Error::io(unprocessed, e))?;
    let mut reader = BufReader::new(input);
    let mut writer = JsonlWriter::create_staged(&dest_dir.join(PROCESSED_DATASET_FILE))?;

    let mut dropped = 0;
    let mut malformed = 0;
    let mut line_no = 0;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| Error::io(unprocessed, e))?;
        if n == 0 {
            break;
        }
        line_no += 1;

        let line = String::from_utf8_lossy(&buf);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let record = match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(record)) => record,
            Ok(_) | Err(_) => {
                debug!(line = line_no, "skipping malformed record");
                malformed += 1;
                continue;
            }
        };

        let key = comparison_key(&record, division);
        if spec.keeps(spec.matches_exact(key)) {
            writer.write(&record)?;
        } else {
            dropped += 1;
        }
    }

    let kept = writer.written();
    let path = writer.finish()?;
    info!(
        division = %division,
        mode = %spec.mode,
        kept,
        dropped,
        malformed,
        "processed dataset written to {}",
        path.display()
    );

    Ok(RecordFilterReport {
        path,
        division,
        kept,
        dropped,
        malformed,
    })
}

fn comparison_key(record: &Map<String, Value>, division: Division) -> &str {
    let value = match division {
        Division::File => record.get("filename"),
        Division::Method => record.get("method").and_then(|m| m.get("name")),
        Division::Class => record.get("class").and_then(|c| c.get("name")),
        Division::Line => None,
    };
    value.and_then(Value::as_str).unwrap_or("")
}
