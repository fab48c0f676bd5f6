//! Language segmenters
//!
//! A segmenter cuts one file's content into ordered lists of method units
//! and class units. Dispatch is by file extension:
//!
//! - **Python**: every `def` and `class` found anywhere in the syntax tree.
//!   Unit content is the name only.
//! - **Java** and **C++**: each declaration's position is mapped to a
//!   character offset and the unit content is the brace-balanced block that
//!   follows it (see [`blocks`]).
//! - Anything else: no segmenter, `None`.
//!
//! Segmentation never fails a run. A file that cannot be parsed produces
//! empty lists.

pub mod blocks;
mod brace;
mod cpp;
mod java;
mod python;

use std::path::Path;

use serde::Serialize;
use tracing::{debug, trace};
use tree_sitter::{Node, Parser, Tree};

use crate::division::Division;
use crate::language::Language;
use crate::walker::relative_display;

pub use cpp::CppSegmenter;
pub use java::JavaSegmenter;
pub use python::PythonSegmenter;

/// A single extracted piece of code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeUnit {
    pub kind: Division,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub content: String,
    pub relative_path: String,
}

impl CodeUnit {
    pub fn method(name: impl Into<String>, content: impl Into<String>, relative_path: &str) -> Self {
        Self {
            kind: Division::Method,
            name: Some(name.into()),
            content: content.into(),
            relative_path: relative_path.to_string(),
        }
    }

    pub fn class(name: impl Into<String>, content: impl Into<String>, relative_path: &str) -> Self {
        Self {
            kind: Division::Class,
            name: Some(name.into()),
            content: content.into(),
            relative_path: relative_path.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

/// Method and class units of one file, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segments {
    pub methods: Vec<CodeUnit>,
    pub classes: Vec<CodeUnit>,
}

impl Segments {
    /// Units of the given division. File and line divisions have none.
    pub fn into_units(self, division: Division) -> Vec<CodeUnit> {
        match division {
            Division::Method => self.methods,
            Division::Class => self.classes,
            Division::File | Division::Line => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty() && self.classes.is_empty()
    }
}

/// Per-language segmentation strategy.
pub trait Segmenter: Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Segment one file. `None` means the language is not supported.
    fn segment(&self, relative_path: &str, content: &str) -> Option<Segments>;
}

/// Fallback for files with no language segmenter.
///
/// Always reports "not supported" rather than inventing units.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedSegmenter;

impl Segmenter for UnsupportedSegmenter {
    fn name(&self) -> &'static str {
        "unsupported"
    }

    fn segment(&self, relative_path: &str, _content: &str) -> Option<Segments> {
        debug!(file = relative_path, "no segmenter for this language");
        None
    }
}

/// Pick the segmenter for a language.
pub fn segmenter_for(language: Language) -> &'static dyn Segmenter {
    match language {
        Language::Python => &PythonSegmenter,
        Language::Java => &JavaSegmenter,
        Language::Cpp => &CppSegmenter,
    }
}

/// Pick the segmenter for a path, falling back to [`UnsupportedSegmenter`].
pub fn segmenter_for_path(relative_path: &Path) -> &'static dyn Segmenter {
    match Language::from_path(relative_path) {
        Some(language) => segmenter_for(language),
        None => &UnsupportedSegmenter,
    }
}

/// Segment a file by its (relative) path and content.
///
/// Returns `None` for unrecognized or unsupported extensions; callers skip
/// such files.
pub fn segment(relative_path: &Path, content: &str) -> Option<Segments> {
    let segmenter = segmenter_for_path(relative_path);
    let relative = relative_display(relative_path);
    trace!(file = %relative, segmenter = segmenter.name(), "segmenting");
    segmenter.segment(&relative, content)
}

/// Parse `content` with a tree-sitter grammar. `None` if the parser gives up.
pub(crate) fn parse(language: tree_sitter::Language, content: &str) -> Option<Tree> {
    let mut parser = Parser::new();
    if let Err(e) = parser.set_language(&language) {
        debug!(error = %e, "failed to load grammar");
        return None;
    }
    parser.parse(content, None)
}

/// Visit every node of a tree in pre-order (document order).
pub(crate) fn visit_nodes<'t>(tree: &'t Tree, mut visit: impl FnMut(Node<'t>)) {
    let mut cursor = tree.walk();
    loop {
        visit(cursor.node());
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// Text of one of a node's fields.
pub(crate) fn field_text(node: Node<'_>, field: &str, source: &[u8]) -> Option<String> {
    node.child_by_field_name(field)?
        .utf8_text(source)
        .ok()
        .map(str::to_string)
}
