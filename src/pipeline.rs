//! End-to-end pipeline: raw tree to processed datasets
//!
//! ```text
//! <workspace>/raw            input tree, never modified
//! <workspace>/file_filtered  copy made by the extension filter, then narrowed by filename
//! <workspace>/divisioned     <division>/unprocessed_dataset.jsonl
//! <workspace>/processed      <division>/processed_dataset.jsonl
//! ```
//!
//! The run is driven by a JSON [`PipelineConfig`]:
//!
//! ```json
//! {
//!   "divisions": ["file", "method"],
//!   "filters": {
//!     "file_extension": {"mode": "in", "patterns": [".py", ".java"]},
//!     "method_name": {"mode": "out", "patterns": ["main"]}
//!   },
//!   "jobs": 0
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dataset::{DatasetConfig, DatasetReport, UNPROCESSED_DATASET_FILE, build_dataset};
use crate::division::Division;
use crate::error::{Error, Result};
use crate::filter::{
    FilterSpec, OccurrenceCounter, RecordFilterReport, filter_by_extension, filter_by_filename,
    filter_dataset,
};

/// Directories used by each stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineLayout {
    pub raw: PathBuf,
    pub file_filtered: PathBuf,
    pub divisioned: PathBuf,
    pub processed: PathBuf,
}

impl PipelineLayout {
    /// Default directory names under one workspace directory.
    pub fn under(workspace: &Path) -> Self {
        Self {
            raw: workspace.join("raw"),
            file_filtered: workspace.join("file_filtered"),
            divisioned: workspace.join("divisioned"),
            processed: workspace.join("processed"),
        }
    }

    pub fn unprocessed_dataset(&self, division: Division) -> PathBuf {
        self.divisioned
            .join(division.as_str())
            .join(UNPROCESSED_DATASET_FILE)
    }
}

/// Which filter applies at each stage. Absent filters keep everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineFilters {
    #[serde(default)]
    pub file_extension: Option<FilterSpec>,
    #[serde(default)]
    pub filename: Option<FilterSpec>,
    #[serde(default)]
    pub method_name: Option<FilterSpec>,
    #[serde(default)]
    pub class_name: Option<FilterSpec>,
}

impl PipelineFilters {
    /// The record filter for a division's dataset, if that division can be
    /// record-filtered at all.
    pub fn record_filter(&self, division: Division) -> Option<FilterSpec> {
        let configured = match division {
            Division::File => &self.filename,
            Division::Method => &self.method_name,
            Division::Class => &self.class_name,
            Division::Line => return None,
        };
        Some(configured.clone().unwrap_or_else(FilterSpec::keep_all))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    pub divisions: Vec<Division>,
    #[serde(default)]
    pub filters: PipelineFilters,
    /// 0 = auto, 1 = sequential, N = N workers
    #[serde(default)]
    pub jobs: usize,
    #[serde(default)]
    pub max_file_size: Option<u64>,
}

impl PipelineConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&text)
    }

    /// Parse and validate a JSON config. Unknown divisions, modes or keys are
    /// configuration errors.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.divisions.is_empty() {
            return Err(Error::Config("at least one division is required".to_string()));
        }
        for (i, division) in self.divisions.iter().enumerate() {
            if self.divisions[..i].contains(division) {
                return Err(Error::Config(format!("division '{division}' listed twice")));
            }
        }
        Ok(())
    }

    fn dataset_config(&self) -> DatasetConfig {
        DatasetConfig {
            jobs: self.jobs,
            max_file_size: self.max_file_size,
        }
    }
}

/// Everything a pipeline run produced.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// Files copied by the extension filter
    pub extension_counter: OccurrenceCounter,
    /// Files left after the filename filter, when one was configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename_counter: Option<OccurrenceCounter>,
    pub datasets: Vec<DatasetReport>,
    pub processed: Vec<RecordFilterReport>,
}

/// Run every stage in order.
///
/// `file_filtered` is wiped at the start of each run. Output from earlier
/// runs in `divisioned` and `processed` is overwritten per division.
pub fn run_pipeline(config: &PipelineConfig, layout: &PipelineLayout) -> Result<PipelineReport> {
    config.validate()?;
    if layout.raw.starts_with(&layout.file_filtered)
        || layout.file_filtered.starts_with(&layout.raw)
    {
        return Err(Error::Config(
            "file-filtered and raw directories must not contain each other".to_string(),
        ));
    }
    if !layout.raw.is_dir() {
        return Err(Error::SourceMissing(layout.raw.clone()));
    }

    reset_dir(&layout.file_filtered)?;

    let extension_spec = config
        .filters
        .file_extension
        .clone()
        .unwrap_or_else(FilterSpec::keep_all);
    let extension_counter = filter_by_extension(&extension_spec, &layout.raw, &layout.file_filtered)?;

    let filename_counter = match &config.filters.filename {
        Some(spec) => Some(filter_by_filename(spec, &layout.file_filtered)?),
        None => None,
    };

    let dataset_config = config.dataset_config();
    let mut datasets = Vec::with_capacity(config.divisions.len());
    let mut processed = Vec::new();
    for &division in &config.divisions {
        let dataset = build_dataset(
            &layout.file_filtered,
            division,
            &layout.divisioned.join(division.as_str()),
            &dataset_config,
        )?;

        if let Some(spec) = config.filters.record_filter(division) {
            let report = filter_dataset(
                &dataset.path,
                division,
                &spec,
                &layout.processed.join(division.as_str()),
            )?;
            processed.push(report);
        }
        datasets.push(dataset);
    }

    info!(
        divisions = config.divisions.len(),
        files = extension_counter.total(),
        "pipeline finished"
    );

    Ok(PipelineReport {
        extension_counter,
        filename_counter,
        datasets,
        processed,
    })
}

fn reset_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))
}
