//! Python segmentation

use super::{CodeUnit, Segmenter, Segments, field_text, parse, visit_nodes};

/// Collects every function and class definition by name.
///
/// Nested definitions, methods and decorated definitions are all included.
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonSegmenter;

impl Segmenter for PythonSegmenter {
    fn name(&self) -> &'static str {
        "python"
    }

    fn segment(&self, relative_path: &str, content: &str) -> Option<Segments> {
        let mut segments = Segments::default();
        let Some(tree) = parse(tree_sitter_python::LANGUAGE.into(), content) else {
            return Some(segments);
        };

        let source = content.as_bytes();
        visit_nodes(&tree, |node| match node.kind() {
            "function_definition" => {
                if let Some(name) = field_text(node, "name", source) {
                    segments
                        .methods
                        .push(CodeUnit::method(name.clone(), name, relative_path));
                }
            }
            "class_definition" => {
                if let Some(name) = field_text(node, "name", source) {
                    segments
                        .classes
                        .push(CodeUnit::class(name.clone(), name, relative_path));
                }
            }
            _ => {}
        });

        Some(segments)
    }
}
