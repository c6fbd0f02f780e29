//! Frame command buffer.
//!
//! A frame is composed into a `Writer` and flushed once, so the terminal never sees a
//! half-drawn frame. Consecutive text prints are merged into one command; capability
//! strings (attribute changes, cursor motion) stay separate and act as batch
//! boundaries.

use anyhow::Result;
use crossterm::{queue, style::Print};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Print(String),
    /// Opaque capability string.
    Control(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterStats {
    pub print_commands: u64,
    pub control_commands: u64,
    pub bytes: usize,
}

#[derive(Debug, Default)]
pub struct Writer {
    cmds: Vec<Command>,
    pending: String,
    stats: WriterStats,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let s = std::mem::take(&mut self.pending);
        self.cmds.push(Command::Print(s));
        self.stats.print_commands += 1;
    }

    pub fn print(&mut self, s: &str) {
        self.pending.push_str(s);
        self.stats.bytes += s.len();
    }

    pub fn print_char(&mut self, ch: char) {
        self.pending.push(ch);
        self.stats.bytes += ch.len_utf8();
    }

    /// Queue `n` spaces.
    pub fn pad(&mut self, n: usize) {
        self.pending.extend(std::iter::repeat_n(' ', n));
        self.stats.bytes += n;
    }

    pub fn control(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.flush_pending();
        self.cmds.push(Command::Control(s.to_owned()));
        self.stats.control_commands += 1;
        self.stats.bytes += s.len();
    }

    /// Commands composed so far, with any pending text batched.
    #[cfg(test)]
    pub(crate) fn commands(&mut self) -> &[Command] {
        self.flush_pending();
        &self.cmds
    }

    #[cfg(test)]
    pub(crate) fn stats(&self) -> WriterStats {
        let mut stats = self.stats;
        if !self.pending.is_empty() {
            stats.print_commands += 1;
        }
        stats
    }

    /// Write the whole frame with a single `write_all`, then flush.
    pub fn flush_to<W: Write>(mut self, out: &mut W) -> Result<WriterStats> {
        self.flush_pending();
        let mut frame = Vec::with_capacity(self.stats.bytes);
        for c in self.cmds {
            match c {
                Command::Print(s) | Command::Control(s) => {
                    queue!(frame, Print(s))?;
                }
            }
        }
        out.write_all(&frame)?;
        out.flush()?;
        Ok(self.stats)
    }
}
