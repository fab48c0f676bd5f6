//! Include/exclude filtering
//!
//! Both file-level filters and the record filter share one rule: a
//! [`FilterSpec`] in `in` mode keeps only matches, in `out` mode keeps only
//! non-matches. What "match" means depends on the caller (extension suffix,
//! exact filename, unit name).

pub mod files;
pub mod records;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub use files::{filter_by_extension, filter_by_filename};
pub use records::{PROCESSED_DATASET_FILE, RecordFilterReport, filter_dataset};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Keep only what matches
    In,
    /// Keep only what does not match
    Out,
}

impl FilterMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterMode::In => "in",
            FilterMode::Out => "out",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in" => Ok(FilterMode::In),
            "out" => Ok(FilterMode::Out),
            _ => Err(Error::InvalidMode(s.to_string())),
        }
    }
}

/// A mode plus the patterns it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub mode: FilterMode,
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl FilterSpec {
    pub fn new(mode: FilterMode, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            mode,
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Everything passes: `out` with nothing to exclude.
    pub fn keep_all() -> Self {
        Self {
            mode: FilterMode::Out,
            patterns: Vec::new(),
        }
    }

    /// Apply the mode to a match result.
    pub fn keeps(&self, matched: bool) -> bool {
        match self.mode {
            FilterMode::In => matched,
            FilterMode::Out => !matched,
        }
    }

    /// True if `value` equals one of the patterns.
    pub fn matches_exact(&self, value: &str) -> bool {
        self.patterns.iter().any(|p| p == value)
    }

    /// True if `value` ends with one of the patterns.
    pub fn matches_suffix(&self, value: &str) -> bool {
        self.patterns.iter().any(|p| value.ends_with(p.as_str()))
    }
}

/// Names starting with `.` or `_` are never visited by the file filters.
pub fn is_excluded_name(name: &str) -> bool {
    name.starts_with('.') || name.starts_with('_')
}

/// Bare filename to number of surviving files with that name.
///
/// Keys are ordered so printed and serialized counters are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OccurrenceCounter(BTreeMap<String, usize>);

impl OccurrenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &str) {
        *self.0.entry(name.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, name: &str) -> usize {
        self.0.get(name).copied().unwrap_or(0)
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of surviving files.
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// Names that survived in more than one directory.
    pub fn duplicates(&self) -> Vec<(&str, usize)> {
        self.0
            .iter()
            .filter(|&(_, &count)| count > 1)
            .map(|(name, &count)| (name.as_str(), count))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(name, &count)| (name.as_str(), count))
    }
}
