//! Brace-balanced block extraction
//!
//! Pure text functions used by the brace-based segmenters. Offsets are
//! character offsets (not bytes) into the full source text.

/// Character span of a brace-balanced block, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    pub open: usize,
    pub close: usize,
}

/// Convert a 1-indexed (line, column) position into a 0-indexed character offset.
///
/// The offset is the total length of all preceding lines, each counted with
/// its line terminator, plus `column - 1`. Returns `None` for a zero line or
/// column, or a position past the end of the text.
///
/// ```
/// use codeslice::segment::blocks::line_col_to_offset;
///
/// let src = "class A {\n  void f() {}\n}";
/// assert_eq!(line_col_to_offset(src, 1, 1), Some(0));
/// assert_eq!(line_col_to_offset(src, 2, 3), Some(12));
/// ```
pub fn line_col_to_offset(source: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 || column == 0 {
        return None;
    }

    let mut lines = source.split_inclusive('\n');
    let mut offset = 0;
    for _ in 1..line {
        offset += lines.next()?.chars().count();
    }
    offset += column - 1;

    if offset > source.chars().count() {
        return None;
    }
    Some(offset)
}

/// Find the first `{` at or after `start` and its matching `}`.
pub fn find_block(code: &str, start: usize) -> Option<BlockSpan> {
    find_block_within(code, start, usize::MAX)
}

/// Like [`find_block`], but the opening brace must occur before `limit`.
///
/// The matching close may lie past `limit`; only the search for the opening
/// brace is bounded.
pub fn find_block_within(code: &str, start: usize, limit: usize) -> Option<BlockSpan> {
    let mut open = None;
    let mut depth = 0usize;

    for (idx, ch) in code.chars().enumerate().skip(start) {
        match ch {
            '{' => {
                if open.is_none() {
                    if idx >= limit {
                        return None;
                    }
                    open = Some(idx);
                }
                depth += 1;
            }
            '}' if open.is_some() => {
                depth -= 1;
                if depth == 0 {
                    return open.map(|open| BlockSpan { open, close: idx });
                }
            }
            _ => {
                if open.is_none() && idx >= limit {
                    return None;
                }
            }
        }
    }
    None
}

/// Extract the brace-balanced block starting at the first `{` at or after `start`.
///
/// Returns `None` when no `{` follows `start` or the source ends before the
/// block closes.
///
/// ```
/// use codeslice::segment::blocks::extract_block;
///
/// let code = "void bar() { if (x) { y(); } } // tail";
/// assert_eq!(extract_block(code, 0), Some("{ if (x) { y(); } }"));
/// assert_eq!(extract_block("int x;", 0), None);
/// ```
pub fn extract_block(code: &str, start: usize) -> Option<&str> {
    find_block(code, start).and_then(|span| slice_chars(code, span))
}

/// Slice `code` by an inclusive character span.
pub fn slice_chars(code: &str, span: BlockSpan) -> Option<&str> {
    let begin = byte_index(code, span.open)?;
    let end = byte_index(code, span.close + 1).unwrap_or(code.len());
    code.get(begin..end)
}

/// Byte index of the `char_idx`-th character, or `None` past the end.
fn byte_index(code: &str, char_idx: usize) -> Option<usize> {
    code.char_indices().nth(char_idx).map(|(b, _)| b)
}

/// Number of characters in `code[..byte_idx]`.
pub fn char_offset(code: &str, byte_idx: usize) -> usize {
    code.get(..byte_idx)
        .map(|s| s.chars().count())
        .unwrap_or_else(|| code.chars().count())
}
