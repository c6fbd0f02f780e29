//! Single line emission.
//!
//! Width rules:
//! * a tab advances to the next multiple of 8 and is written as spaces;
//! * the NUL placeholder between text and description is written as one space;
//! * CSI/OSC sequences are written verbatim and take no columns;
//! * any other control codepoint is dropped;
//! * everything else takes its Unicode display width.
//!
//! A codepoint that would cross the right edge ends the line. Unused columns are padded
//! with spaces so nothing stale survives from the previous frame, and the line always
//! ends with every attribute reset.

use core_filter::MatchSpan;
use core_terminal::{Capability, CapabilityProvider, TerminalError};
use core_text::ansi::{Piece, pieces};
use core_text::width::{char_width, next_tab_stop};

use crate::style::Attr;
use crate::writer::Writer;

#[derive(Debug, Clone)]
pub struct LineRenderer {
    enter_standout: String,
    enter_underline: String,
    exit_underline: String,
    exit_attributes: String,
}

impl LineRenderer {
    pub fn new(caps: &dyn CapabilityProvider) -> Result<Self, TerminalError> {
        Ok(Self {
            enter_standout: caps.require(Capability::EnterStandout)?.to_owned(),
            enter_underline: caps.require(Capability::EnterUnderline)?.to_owned(),
            exit_underline: caps.require(Capability::ExitUnderline)?.to_owned(),
            exit_attributes: caps.require(Capability::ExitAttributes)?.to_owned(),
        })
    }

    /// Emit `line` into exactly `cols` columns. `span` holds byte offsets into `line`
    /// to underline. Returns the columns used by content, before padding.
    pub fn render(
        &self,
        w: &mut Writer,
        line: &str,
        cols: usize,
        standout: bool,
        span: Option<MatchSpan>,
    ) -> usize {
        let mut attrs = Attr::empty();
        if standout {
            w.control(&self.enter_standout);
            attrs.insert(Attr::STANDOUT);
        }

        let mut col = 0;
        for piece in pieces(line) {
            let (at, ch) = match piece {
                Piece::Escape(seq) => {
                    w.print(seq);
                    continue;
                }
                Piece::Char(at, ch) => (at, ch),
            };
            let width = match ch {
                '\t' => next_tab_stop(col) - col,
                '\0' => 1,
                c if c.is_control() => continue,
                c => char_width(c),
            };
            if col + width > cols {
                break;
            }

            let underline = span.is_some_and(|s| s.start <= at && at < s.end);
            if underline != attrs.contains(Attr::UNDERLINE) {
                if underline {
                    w.control(&self.enter_underline);
                } else {
                    w.control(&self.exit_underline);
                }
                attrs.toggle(Attr::UNDERLINE);
            }

            match ch {
                '\t' | '\0' => w.pad(width),
                c => w.print_char(c),
            }
            col += width;
        }

        if attrs.contains(Attr::UNDERLINE) {
            w.control(&self.exit_underline);
        }
        w.pad(cols.saturating_sub(col));
        w.control(&self.exit_attributes);
        col
    }
}
