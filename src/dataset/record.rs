//! JSON shapes of dataset records

use serde::{Deserialize, Serialize};

use crate::segment::CodeUnit;

/// Name and source text of a method or class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedBlock {
    pub name: String,
    pub content: String,
}

/// One line of a dataset file. The JSON shape depends on the division:
///
/// ```text
/// file:   {"filepath": ..., "filename": ..., "content": ...}
/// line:   {"filepath": ..., "line": ...}
/// method: {"filepath": ..., "method": {"name": ..., "content": ...}}
/// class:  {"filepath": ..., "class": {"name": ..., "content": ...}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DatasetRecord {
    File {
        filepath: String,
        filename: String,
        content: String,
    },
    Line {
        filepath: String,
        line: String,
    },
    Method {
        filepath: String,
        method: NamedBlock,
    },
    Class {
        filepath: String,
        class: NamedBlock,
    },
}

impl DatasetRecord {
    /// Record for a method or class unit. File and line units carry no
    /// name and are built directly instead.
    pub fn from_unit(unit: CodeUnit) -> Option<Self> {
        use crate::division::Division;

        let block = NamedBlock {
            name: unit.name.unwrap_or_default(),
            content: unit.content,
        };
        match unit.kind {
            Division::Method => Some(DatasetRecord::Method {
                filepath: unit.relative_path,
                method: block,
            }),
            Division::Class => Some(DatasetRecord::Class {
                filepath: unit.relative_path,
                class: block,
            }),
            Division::File | Division::Line => None,
        }
    }
}
