//! Byte-offset → (line, column) translation.
//!
//! `rustpython-ast` nodes carry byte-range (`TextRange`) positions via the
//! [`Ranged`] trait. The `Finding` model wants 1-based lines and 0-based
//! columns. `Locator` is the one place that conversion happens, built once
//! per file from the line-start byte offsets.

use rustpython_ast::{Ranged, TextSize};

/// Maps byte offsets within a source string to 1-based line / 0-based
/// column positions.
///
/// Built once per file and shared (by reference) across every rule
/// invocation for that file — line-start offsets never change during a
/// single analysis pass.
pub struct Locator<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> Locator<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        for (offset, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(offset + 1);
            }
        }
        Self { source, line_starts }
    }

    /// Translate a byte offset into a 1-based line, 0-based column pair.
    ///
    /// The column is a byte offset within the line, not a grapheme count —
    /// consistent with `TextSize` itself being byte-based.
    #[must_use]
    pub fn line_column(&self, offset: TextSize) -> (u32, u32) {
        let offset = usize::from(offset).min(self.source.len());
        let line_index = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let line_start = self.line_starts[line_index];
        let column = (offset - line_start) as u32;
        (line_index as u32 + 1, column)
    }

    /// Convenience for any node implementing [`Ranged`]: the node's start
    /// position as a (line, column) pair.
    #[must_use]
    pub fn start_line_column<T: Ranged>(&self, node: &T) -> (u32, u32) {
        self.line_column(node.range().start())
    }

    /// The source text covering a node's full range, used for
    /// `Finding::with_snippet`.
    #[must_use]
    pub fn text<T: Ranged>(&self, node: &T) -> &'a str {
        let range = node.range();
        &self.source[usize::from(range.start())..usize::from(range.end())]
    }
}
