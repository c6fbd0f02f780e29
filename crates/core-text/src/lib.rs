//! Text primitives shared by matching, state and rendering.
//!
//! * [`query::Query`] is the editable codepoint buffer holding the live search text.
//! * [`width`] is the single authority for terminal column widths.
//! * [`ansi`] scans passthrough escape sequences (CSI / OSC) embedded in candidate lines.
//!
//! All offsets exposed by [`Query`] are codepoint indices; byte offsets only appear in
//! the scanning helpers and are always codepoint aligned.

pub mod ansi;
pub mod query;
pub mod width;

pub use query::{MatchMode, Query, RejectedInput};
pub use width::char_width;

/// Number of bytes in the UTF-8 encoding announced by `lead`.
///
/// The count of leading one bits equals the encoded length for multi-byte sequences;
/// ASCII reports 1 and a stray continuation byte reports 0.
#[inline]
pub fn utf8_len(lead: u8) -> usize {
    match lead.leading_ones() {
        0 => 1,
        n @ 2..=4 => n as usize,
        _ => 0,
    }
}
