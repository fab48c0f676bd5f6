//! Shared brace-block strategy for class-based compiled languages

use tracing::debug;
use tree_sitter::Node;

use super::blocks::{char_offset, find_block_within, line_col_to_offset, slice_chars};
use super::{CodeUnit, Segments, parse, visit_nodes};
use crate::division::Division;

/// Grammar-specific hooks for the brace strategy.
pub(crate) trait BraceGrammar {
    fn language(&self) -> tree_sitter::Language;

    /// `Method` or `Class` for declaration nodes, `None` for everything else.
    fn classify(&self, node: Node<'_>) -> Option<Division>;

    fn unit_name(&self, node: Node<'_>, source: &[u8]) -> Option<String>;
}

/// Segment `content` by locating each declaration and cutting out the
/// brace-balanced block that follows it.
///
/// A parser failure yields empty segments, not `None`: the language is
/// supported, the file just has nothing usable.
pub(crate) fn segment_braced<G: BraceGrammar>(
    grammar: &G,
    relative_path: &str,
    content: &str,
) -> Segments {
    let mut segments = Segments::default();
    let Some(tree) = parse(grammar.language(), content) else {
        debug!(file = relative_path, "parse failed, no units extracted");
        return segments;
    };

    let source = content.as_bytes();
    visit_nodes(&tree, |node| {
        let Some(kind) = grammar.classify(node) else {
            return;
        };
        let Some(name) = grammar.unit_name(node, source) else {
            return;
        };
        let Some(block) = declaration_block(content, node) else {
            debug!(file = relative_path, unit = %name, "no brace block, unit skipped");
            return;
        };

        match kind {
            Division::Class => segments
                .classes
                .push(CodeUnit::class(name, block, relative_path)),
            _ => segments
                .methods
                .push(CodeUnit::method(name, block, relative_path)),
        }
    });

    segments
}

/// Brace block for a declaration node, found from its (line, column) start.
///
/// The opening brace must lie inside the declaration; a body-less
/// declaration such as `abstract void f();` has no block.
fn declaration_block<'s>(content: &'s str, node: Node<'_>) -> Option<&'s str> {
    let start = node.start_position();
    let line_start_byte = node.start_byte().checked_sub(start.column)?;
    let column_chars = content.get(line_start_byte..node.start_byte())?.chars().count();

    let offset = line_col_to_offset(content, start.row + 1, column_chars + 1)?;
    let limit = char_offset(content, node.end_byte());
    let span = find_block_within(content, offset, limit)?;
    slice_chars(content, span)
}
