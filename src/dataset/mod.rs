//! Division dispatcher: turns a filtered tree into an unprocessed dataset
//!
//! Every file under the source root is cut according to the division and
//! each resulting record is written straight to
//! `<dest>/unprocessed_dataset.jsonl`. Files that cannot be read are logged
//! and skipped; they never abort the run.
//!
//! With `jobs != 1` files are read and segmented on a rayon pool in bounded
//! batches. Each batch is written in walk order, so the output is identical
//! to a sequential run.

mod record;
mod writer;

use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::division::Division;
use crate::error::Result;
use crate::segment::segment;
use crate::source::SourceFile;
use crate::walker::{WalkedFile, relative_display, walk_files};

pub use record::{DatasetRecord, NamedBlock};
pub use writer::JsonlWriter;

/// File name of the dataset written by [`build_dataset`].
pub const UNPROCESSED_DATASET_FILE: &str = "unprocessed_dataset.jsonl";

/// Files handed to the pool at once in parallel mode.
const PARALLEL_BATCH: usize = 256;

/// Configuration for dataset building.
#[derive(Debug, Clone, Default)]
pub struct DatasetConfig {
    /// Number of parallel workers for reading and segmentation.
    /// 0 = auto-detect (use all available cores)
    /// 1 = sequential (no parallelism)
    /// N = use N worker threads
    pub jobs: usize,
    /// Skip files larger than this many bytes.
    pub max_file_size: Option<u64>,
}

/// Outcome of one dataset build.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetReport {
    pub path: PathBuf,
    pub division: Division,
    pub files_visited: usize,
    pub files_skipped: usize,
    pub records: usize,
}

/// Build the unprocessed dataset for `division` from every file under `source_root`.
///
/// A missing source root produces an empty dataset.
pub fn build_dataset(
    source_root: &Path,
    division: Division,
    dest_root: &Path,
    config: &DatasetConfig,
) -> Result<DatasetReport> {
    if !source_root.is_dir() {
        warn!(source = %source_root.display(), "source folder missing, dataset will be empty");
    }

    let mut writer = JsonlWriter::create(&dest_root.join(UNPROCESSED_DATASET_FILE))?;
    let mut files_visited = 0;
    let mut files_skipped = 0;

    let runner = Runner::new(config.jobs);
    let batch_size = if matches!(runner, Runner::Sequential) {
        1
    } else {
        PARALLEL_BATCH
    };

    let mut files = walk_files(source_root);
    loop {
        let batch: Vec<WalkedFile> = files.by_ref().take(batch_size).collect();
        if batch.is_empty() {
            break;
        }

        let outcomes = runner.map(&batch, |file| file_records(file, division, config.max_file_size));
        for (file, outcome) in batch.iter().zip(outcomes) {
            files_visited += 1;
            match outcome {
                Ok(records) => {
                    for record in &records {
                        writer.write(record)?;
                    }
                }
                Err(e) => {
                    files_skipped += 1;
                    warn!(file = %file.path.display(), error = %e, "skipping file");
                }
            }
        }
    }

    let records = writer.written();
    let path = writer.finish()?;
    info!(
        division = %division,
        files = files_visited,
        skipped = files_skipped,
        records,
        "dataset written to {}",
        path.display()
    );

    Ok(DatasetReport {
        path,
        division,
        files_visited,
        files_skipped,
        records,
    })
}

/// Read one file and cut it into records for `division`.
pub fn file_records(
    file: &WalkedFile,
    division: Division,
    max_file_size: Option<u64>,
) -> io::Result<Vec<DatasetRecord>> {
    let source = SourceFile::read(file, max_file_size)?;
    Ok(records_for_source(source, division))
}

/// Cut an already loaded file into records for `division`.
pub fn records_for_source(source: SourceFile, division: Division) -> Vec<DatasetRecord> {
    let filepath = relative_display(&source.relative);

    match division {
        Division::File => {
            let filename = source
                .path
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            vec![DatasetRecord::File {
                filepath,
                filename,
                content: source.content,
            }]
        }
        Division::Line => source
            .content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| DatasetRecord::Line {
                filepath: filepath.clone(),
                line: line.to_string(),
            })
            .collect(),
        Division::Method | Division::Class => segment(&source.relative, &source.content)
            .map(|segments| {
                segments
                    .into_units(division)
                    .into_iter()
                    .filter_map(DatasetRecord::from_unit)
                    .collect()
            })
            .unwrap_or_default(),
    }
}

/// Where per-file work runs.
enum Runner {
    Sequential,
    Global,
    Pool(rayon::ThreadPool),
}

impl Runner {
    fn new(jobs: usize) -> Self {
        match jobs {
            1 => Runner::Sequential,
            0 => Runner::Global,
            n => match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
                Ok(pool) => Runner::Pool(pool),
                Err(e) => {
                    // Fall back to rayon's global pool if custom pool creation fails
                    warn!(error = %e, "could not build thread pool, using global pool");
                    Runner::Global
                }
            },
        }
    }

    /// Map over a batch, keeping input order.
    fn map<T, F>(&self, batch: &[WalkedFile], f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&WalkedFile) -> T + Sync + Send,
    {
        match self {
            Runner::Sequential => batch.iter().map(f).collect(),
            Runner::Global => batch.par_iter().map(f).collect(),
            Runner::Pool(pool) => pool.install(|| batch.par_iter().map(f).collect()),
        }
    }
}
