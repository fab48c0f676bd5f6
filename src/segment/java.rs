//! Java segmentation

use tree_sitter::Node;

use super::brace::{BraceGrammar, segment_braced};
use super::{Segmenter, Segments, field_text};
use crate::division::Division;

const CLASS_KINDS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
    "annotation_type_declaration",
];

const METHOD_KINDS: &[&str] = &["method_declaration", "constructor_declaration"];

/// Extracts the brace block of every type and method declaration.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaSegmenter;

impl BraceGrammar for JavaSegmenter {
    fn language(&self) -> tree_sitter::Language {
        tree_sitter_java::LANGUAGE.into()
    }

    fn classify(&self, node: Node<'_>) -> Option<Division> {
        let kind = node.kind();
        if CLASS_KINDS.contains(&kind) {
            Some(Division::Class)
        } else if METHOD_KINDS.contains(&kind) {
            Some(Division::Method)
        } else {
            None
        }
    }

    fn unit_name(&self, node: Node<'_>, source: &[u8]) -> Option<String> {
        field_text(node, "name", source)
    }
}

impl Segmenter for JavaSegmenter {
    fn name(&self) -> &'static str {
        "java"
    }

    fn segment(&self, relative_path: &str, content: &str) -> Option<Segments> {
        Some(segment_braced(self, relative_path, content))
    }
}
