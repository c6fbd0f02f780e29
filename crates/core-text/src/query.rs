//! Editable query buffer.
//!
//! Storage is a UTF-8 `String`; every offset accepted or returned by the public API is a
//! codepoint index in `0..=len()`, so callers can never split a multi-byte encoding.
//!
//! Cursor bookkeeping is symmetric between [`Query::insert`] and [`Query::delete_range`]:
//! inserting at or before the cursor shifts it right, deleting a range that ends at or
//! before the cursor shifts it left, and a range straddling the cursor collapses it to
//! the range start. Insert-then-delete of the same codepoint therefore restores both the
//! bytes and the cursor.

use thiserror::Error;

/// Codepoint rejected by [`Query::insert`] because it is not printable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rejected non-printable input U+{:04X}", *.0 as u32)]
pub struct RejectedInput(pub char);

/// Matching strategy attached to a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Shortest ordered-subsequence window.
    #[default]
    Standard,
    /// Bounded edit distance against any substring (typo tolerant).
    EditDistance,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Standard => "standard",
            MatchMode::EditDistance => "edit_distance",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    text: String,
    /// Codepoint count of `text`.
    len: usize,
    /// Codepoint index in `0..=len`.
    cursor: usize,
    mode: MatchMode,
}

impl Query {
    /// Build a query from initial text, dropping anything non-printable. Cursor ends up
    /// after the last codepoint.
    pub fn new(initial: &str) -> Self {
        let mut q = Self::default();
        for ch in initial.chars() {
            let at = q.len;
            // Rejected codepoints (controls, NUL) are silently skipped for seeded text.
            let _ = q.insert(at, ch);
        }
        q
    }

    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in codepoints.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Place the cursor, clamped to `0..=len`.
    pub fn set_cursor(&mut self, at: usize) {
        self.cursor = at.min(self.len);
    }

    /// Byte offset of codepoint index `at` (clamped to the end of the text).
    pub fn byte_offset(&self, at: usize) -> usize {
        if at >= self.len {
            return self.text.len();
        }
        self.text
            .char_indices()
            .nth(at)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    /// Byte width of the encoded codepoint beginning at byte `offset`.
    ///
    /// Returns 0 when `offset` is at/after the end or does not start a codepoint.
    pub fn char_len_at(&self, offset: usize) -> usize {
        if !self.text.is_char_boundary(offset) {
            return 0;
        }
        self.text[offset..]
            .chars()
            .next()
            .map(char::len_utf8)
            .unwrap_or(0)
    }

    /// Insert `ch` before codepoint index `at` (clamped to `len`).
    pub fn insert(&mut self, at: usize, ch: char) -> Result<(), RejectedInput> {
        if ch == '\0' || ch.is_control() {
            return Err(RejectedInput(ch));
        }
        let at = at.min(self.len);
        let byte = self.byte_offset(at);
        self.text.insert(byte, ch);
        self.len += 1;
        if at <= self.cursor {
            self.cursor += 1;
        }
        Ok(())
    }

    /// Insert at the cursor and advance past the new codepoint.
    pub fn insert_at_cursor(&mut self, ch: char) -> Result<(), RejectedInput> {
        self.insert(self.cursor, ch)
    }

    /// Remove the codepoints in `[start, end)`, clamping both bounds to `0..=len` and
    /// swapping them when `start > end`. Returns the removed text.
    pub fn delete_range(&mut self, start: usize, end: usize) -> String {
        let (mut start, mut end) = (start.min(self.len), end.min(self.len));
        if start > end {
            std::mem::swap(&mut start, &mut end);
        }
        if start == end {
            return String::new();
        }
        let (bs, be) = (self.byte_offset(start), self.byte_offset(end));
        let removed: String = self.text.drain(bs..be).collect();
        let count = end - start;
        self.len -= count;
        if self.cursor >= end {
            self.cursor -= count;
        } else if self.cursor > start {
            self.cursor = start;
        }
        removed
    }

    /// Backspace. Returns true when something was removed.
    pub fn delete_before_cursor(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.delete_range(self.cursor - 1, self.cursor);
        true
    }

    /// Forward delete. Returns true when something was removed.
    pub fn delete_at_cursor(&mut self) -> bool {
        if self.cursor >= self.len {
            return false;
        }
        self.delete_range(self.cursor, self.cursor + 1);
        true
    }

    /// Erase from the start of the line to the cursor.
    pub fn kill_before_cursor(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.delete_range(0, self.cursor);
        true
    }

    /// Erase from the cursor to the end of the line.
    pub fn kill_after_cursor(&mut self) -> bool {
        if self.cursor >= self.len {
            return false;
        }
        self.delete_range(self.cursor, self.len);
        true
    }

    /// Erase the word before the cursor together with any spaces between it and the cursor.
    pub fn erase_word(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let start = self.word_start_before(self.cursor);
        self.delete_range(start, self.cursor);
        true
    }

    /// Start of the space-delimited word preceding codepoint index `at`.
    pub fn word_start_before(&self, at: usize) -> usize {
        let chars: Vec<char> = self.text.chars().take(at.min(self.len)).collect();
        let mut pos = chars.len().saturating_sub(1);
        while pos > 0 {
            if chars[pos] != ' ' && chars[pos - 1] == ' ' {
                break;
            }
            pos -= 1;
        }
        pos
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.len {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len;
    }

    /// Text from codepoint index `from` to the cursor (used for horizontal scroll math).
    pub fn slice(&self, from: usize, to: usize) -> &str {
        let (from, to) = (from.min(to), to.min(self.len));
        &self.text[self.byte_offset(from)..self.byte_offset(to)]
    }

    /// Text from codepoint index `from` to the end.
    pub fn tail(&self, from: usize) -> &str {
        &self.text[self.byte_offset(from)..]
    }
}
