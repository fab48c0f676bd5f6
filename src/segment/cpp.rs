//! C++ segmentation

use tree_sitter::Node;

use super::brace::{BraceGrammar, segment_braced};
use super::{Segmenter, Segments, field_text};
use crate::division::Division;

/// Extracts class/struct bodies and function definition bodies.
///
/// Forward declarations and prototypes have no body and produce nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct CppSegmenter;

impl BraceGrammar for CppSegmenter {
    fn language(&self) -> tree_sitter::Language {
        tree_sitter_cpp::LANGUAGE.into()
    }

    fn classify(&self, node: Node<'_>) -> Option<Division> {
        match node.kind() {
            "class_specifier" | "struct_specifier" if node.child_by_field_name("body").is_some() => {
                Some(Division::Class)
            }
            "function_definition" => Some(Division::Method),
            _ => None,
        }
    }

    fn unit_name(&self, node: Node<'_>, source: &[u8]) -> Option<String> {
        if node.kind() == "function_definition" {
            function_name(node, source)
        } else {
            field_text(node, "name", source)
        }
    }
}

impl Segmenter for CppSegmenter {
    fn name(&self) -> &'static str {
        "cpp"
    }

    fn segment(&self, relative_path: &str, content: &str) -> Option<Segments> {
        Some(segment_braced(self, relative_path, content))
    }
}

/// Name of a function definition: the declarator inside its function
/// declarator, e.g. `main`, `Widget::draw`, `~Widget`, `operator==`.
///
/// Pointer and reference declarators are unwrapped on the way down.
fn function_name(node: Node<'_>, source: &[u8]) -> Option<String> {
    let mut current = node.child_by_field_name("declarator")?;
    loop {
        if current.kind() == "function_declarator" {
            return field_text(current, "declarator", source);
        }
        current = current
            .child_by_field_name("declarator")
            .or_else(|| current.named_child(0))?;
    }
}
