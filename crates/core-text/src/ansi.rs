//! Terminal escape sequence scanning.
//!
//! Candidate lines may carry colour codes (`ESC [ ... m`) and hyperlinks
//! (`ESC ] ... BEL`). Both are zero-width on screen and are skipped by matching,
//! so every consumer walks lines through [`pieces`] rather than `chars()`.
//!
//! Recognised forms:
//! - CSI: `ESC [` parameter/intermediate bytes, ends at the first byte in `0x40..=0x7E`.
//! - OSC: `ESC ]`, ends at `BEL` or `ESC \`.
//!
//! An unterminated sequence extends to the end of the string.

const ESC: u8 = 0x1b;
const BEL: u8 = 0x07;

/// Byte length of the escape sequence starting at byte `at`, or `None` when no CSI/OSC
/// sequence starts there.
pub fn escape_len(s: &str, at: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.get(at) != Some(&ESC) {
        return None;
    }
    match bytes.get(at + 1) {
        Some(b'[') => {
            let body = &bytes[at + 2..];
            let end = body
                .iter()
                .position(|b| (0x40..=0x7e).contains(b))
                .map(|i| i + 1)
                .unwrap_or(body.len());
            Some(2 + end)
        }
        Some(b']') => {
            let body = &bytes[at + 2..];
            let mut i = 0;
            while i < body.len() {
                if body[i] == BEL {
                    return Some(2 + i + 1);
                }
                if body[i] == ESC && body.get(i + 1) == Some(&b'\\') {
                    return Some(2 + i + 2);
                }
                i += 1;
            }
            Some(2 + body.len())
        }
        _ => None,
    }
}

/// A unit of a display line: either an escape sequence or one codepoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'a> {
    Escape(&'a str),
    /// Byte offset of the codepoint within the line, and the codepoint.
    Char(usize, char),
}

/// Iterator over the [`Piece`]s of a line.
pub struct Pieces<'a> {
    s: &'a str,
    pos: usize,
}

pub fn pieces(s: &str) -> Pieces<'_> {
    Pieces { s, pos: 0 }
}

impl<'a> Iterator for Pieces<'a> {
    type Item = Piece<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.s.len() {
            return None;
        }
        let at = self.pos;
        if let Some(n) = escape_len(self.s, at) {
            // Escape bodies are ASCII up to the terminator, and the end is either the
            // string end or just past an ASCII byte, so this is a char boundary.
            let end = (at + n).min(self.s.len());
            self.pos = end;
            return Some(Piece::Escape(&self.s[at..end]));
        }
        let ch = self.s[at..].chars().next()?;
        self.pos += ch.len_utf8();
        Some(Piece::Char(at, ch))
    }
}

/// Codepoints of `s` with escape sequences removed.
pub fn visible_chars(s: &str) -> impl Iterator<Item = (usize, char)> + '_ {
    pieces(s).filter_map(|p| match p {
        Piece::Char(off, ch) => Some((off, ch)),
        Piece::Escape(_) => None,
    })
}
