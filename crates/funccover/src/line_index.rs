//! Line/column to byte offset mapping.
//!
//! `proc-macro2` reports token positions as a 1-based line and a 0-based
//! column counted in characters. Splicing works on bytes, so every position
//! goes through this index before it is used.

use proc_macro2::LineColumn;

/// Byte offsets of line starts in one source text
#[derive(Debug)]
pub(crate) struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
    base: usize,
}

impl<'a> LineIndex<'a> {
    /// Index `text`, whose first byte sits at `base` in the original content
    pub(crate) fn new(text: &'a str, base: usize) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            text,
            line_starts,
            base,
        }
    }

    /// Byte offset in the original content of `position`
    ///
    /// Returns `None` when the position lies outside the text.
    pub(crate) fn offset(&self, position: LineColumn) -> Option<usize> {
        let line = position.line.checked_sub(1)?;
        let start = *self.line_starts.get(line)?;
        let end = self
            .line_starts
            .get(line + 1)
            .copied()
            .unwrap_or(self.text.len());
        let text = self.text.get(start..end)?;
        text.char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .nth(position.column)
            .map(|within| self.base + start + within)
    }
}
