//! Dataset division: the granularity a source tree is cut into

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Division {
    /// One record per file
    File,
    /// One record per non-empty line
    Line,
    /// One record per method or function
    Method,
    /// One record per class
    Class,
}

impl Division {
    pub const ALL: [Division; 4] = [
        Division::File,
        Division::Line,
        Division::Method,
        Division::Class,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Division::File => "file",
            Division::Line => "line",
            Division::Method => "method",
            Division::Class => "class",
        }
    }

    /// Line records carry no name, so the record filter has nothing to match on.
    pub fn is_record_filterable(&self) -> bool {
        !matches!(self, Division::Line)
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Division {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(Division::File),
            "line" => Ok(Division::Line),
            "method" => Ok(Division::Method),
            "class" => Ok(Division::Class),
            _ => Err(Error::UnknownDivision(s.to_string())),
        }
    }
}
