//! codeslice - cut source trees into file, line, method and class datasets

pub mod dataset;
pub mod division;
pub mod error;
pub mod filter;
pub mod language;
pub mod pipeline;
pub mod report;
pub mod segment;
pub mod source;
pub mod walker;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use dataset::{DatasetConfig, DatasetRecord, DatasetReport, build_dataset};
pub use division::Division;
pub use error::{Error, Result};
pub use filter::{
    FilterMode, FilterSpec, OccurrenceCounter, RecordFilterReport, filter_by_extension,
    filter_by_filename, filter_dataset,
};
pub use pipeline::{PipelineConfig, PipelineLayout, PipelineReport, run_pipeline};
pub use report::{Report, print_report, print_report_json};
pub use segment::{CodeUnit, Segmenter, Segments, segment};
