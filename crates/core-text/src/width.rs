//! Column width of codepoints and strings.
//!
//! All width decisions for query and candidate rendering go through [`char_width`].
//! Tabs are not measured here; they depend on the current column and are handled by
//! [`next_tab_stop`].

use unicode_width::UnicodeWidthChar;

use crate::ansi::{Piece, pieces};

pub const TAB_STOP: usize = 8;

/// Columns occupied by `ch`. Non-printing codepoints report 0.
pub fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}

/// First tab stop strictly after column `col`.
pub fn next_tab_stop(col: usize) -> usize {
    (col / TAB_STOP + 1) * TAB_STOP
}

/// Columns occupied by `s` when printed from column 0. Escape sequences are zero-width
/// and tabs advance to the next stop.
pub fn str_width(s: &str) -> usize {
    let mut col = 0;
    for piece in pieces(s) {
        match piece {
            Piece::Escape(_) => {}
            Piece::Char(_, '\t') => col = next_tab_stop(col),
            Piece::Char(_, ch) => col += char_width(ch),
        }
    }
    col
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_and_wide() {
        assert_eq!(char_width('a'), 1);
        assert_eq!(char_width('界'), 2);
        assert_eq!(char_width('\u{301}'), 0);
    }

    #[test]
    fn tab_stops() {
        assert_eq!(next_tab_stop(0), 8);
        assert_eq!(next_tab_stop(7), 8);
        assert_eq!(next_tab_stop(8), 16);
    }

    #[test]
    fn str_width_ignores_escapes() {
        assert_eq!(str_width("\x1b[1mab\x1b[0m"), 2);
        assert_eq!(str_width("a\tb"), 9);
        assert_eq!(str_width("界x"), 3);
    }
}
