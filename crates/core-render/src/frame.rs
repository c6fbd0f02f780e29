//! Frame composition.
//!
//! A frame is drawn relative to the row the cursor sits on: the query line first, then
//! up to `rows - 1` candidate lines. When fewer candidate lines than fit were drawn and
//! there are candidates at all, everything below is cleared so lines from a longer
//! previous frame disappear. The cursor is then moved back to the query line, at the
//! query cursor's column. Zero-step moves are skipped since parameterised motion treats
//! 0 as 1.

use std::io::Write;
use std::time::Instant;

use anyhow::Result;
use core_state::Session;
use core_terminal::{Capability, CapabilityProvider, TerminalError, check_required};
use tracing::debug;

use crate::line::LineRenderer;
use crate::timing::record_last_frame_ns;
use crate::writer::{Writer, WriterStats};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Candidate lines drawn.
    pub drawn: usize,
    pub writer: WriterStats,
}

pub struct FrameRenderer<'c> {
    caps: &'c dyn CapabilityProvider,
    line: LineRenderer,
    clear_eos: String,
}

impl<'c> FrameRenderer<'c> {
    /// Fails when a capability the frame depends on is missing.
    pub fn new(
        caps: &'c dyn CapabilityProvider,
        alternate_screen: bool,
    ) -> Result<Self, TerminalError> {
        check_required(caps, alternate_screen)?;
        Ok(Self {
            caps,
            line: LineRenderer::new(caps)?,
            clear_eos: caps.require(Capability::ClearToEndOfScreen)?.to_owned(),
        })
    }

    /// Build the command stream for the current session state.
    pub fn compose(&self, session: &Session) -> (Writer, usize) {
        let view = session.view();
        let cols = usize::from(view.cols);
        let lines = view.choices_lines();
        let mut w = Writer::new();

        self.optional(&mut w, Capability::CursorInvisible);
        w.control("\r");
        self.line
            .render(&mut w, session.query().tail(view.x_scroll), cols, false, None);

        let visible = session.visible_count();
        let drawn = visible.saturating_sub(view.y_scroll).min(lines);
        for rank in view.y_scroll..view.y_scroll + drawn {
            let Some(cand) = session.visible(rank) else {
                break;
            };
            w.print("\r\n");
            self.line.render(
                &mut w,
                cand.display(),
                cols,
                rank == view.selection,
                cand.span,
            );
        }

        if drawn < session.candidates().len() && drawn < lines {
            w.print("\r\n");
            w.control(&self.clear_eos);
            self.cursor_up(&mut w, drawn + 1);
        } else {
            self.cursor_up(&mut w, drawn);
        }

        w.control("\r");
        let col = session.cursor_column();
        if col > 0
            && let Some(right) = self.caps.cursor_right(clamp_u16(col))
        {
            w.control(&right);
        }
        self.optional(&mut w, Capability::CursorVisible);
        (w, drawn)
    }

    /// Compose and write one frame.
    pub fn draw<W: Write>(&self, session: &Session, out: &mut W) -> Result<FrameStats> {
        let start = Instant::now();
        let (w, drawn) = self.compose(session);
        let writer = w.flush_to(out)?;
        record_last_frame_ns(start.elapsed().as_nanos() as u64);
        let view = session.view();
        debug!(
            target: "render.frame",
            rows = view.rows,
            cols = view.cols,
            drawn,
            bytes = writer.bytes,
            print_commands = writer.print_commands,
            "frame"
        );
        Ok(FrameStats { drawn, writer })
    }

    fn cursor_up(&self, w: &mut Writer, n: usize) {
        if n == 0 {
            return;
        }
        if let Some(up) = self.caps.cursor_up(clamp_u16(n)) {
            w.control(&up);
        }
    }

    fn optional(&self, w: &mut Writer, cap: Capability) {
        if let Some(s) = self.caps.string(cap) {
            w.control(s);
        }
    }
}

fn clamp_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}
