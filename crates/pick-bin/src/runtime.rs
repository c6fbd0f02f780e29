//! Interactive loop: draw, wait for one event, apply it.

use std::fs::OpenOptions;
use std::io::{BufWriter, IsTerminal};

use anyhow::{Context, Result};
use core_config::Options;
use core_events::Event;
use core_filter::CandidateSet;
use core_input::{InputError, KeyDecoder, KeyTable, TtyInput};
use core_render::FrameRenderer;
use core_state::{Control, Outcome, Session};
use core_terminal::{
    CapabilityProvider, TerminalBackend, TerminalCapabilities, TerminalError, TerminalGuard,
    TtyBackend,
};
use tracing::{debug, info};

pub struct PickerRuntime {
    caps: TerminalCapabilities,
    alternate_screen: bool,
}

impl PickerRuntime {
    pub fn new(caps: TerminalCapabilities, alternate_screen: bool) -> Self {
        Self {
            caps,
            alternate_screen,
        }
    }

    /// Run until the session finishes. The terminal is restored before this returns,
    /// on success and on error.
    pub fn run(&self, options: Options, candidates: CandidateSet) -> Result<(Outcome, Session)> {
        let caps: &dyn CapabilityProvider = &self.caps;
        let renderer = FrameRenderer::new(caps, self.alternate_screen)?;
        let decoder = KeyDecoder::new(KeyTable::with_capabilities(caps));
        let mut input = TtyInput::open().context("open /dev/tty for reading")?;
        let tty = OpenOptions::new()
            .write(true)
            .open("/dev/tty")
            .context("open /dev/tty for writing")?;
        if !tty.is_terminal() {
            return Err(TerminalError::NotATerminal.into());
        }
        let mut backend = TtyBackend::new(BufWriter::new(tty), caps, self.alternate_screen)?;
        let (cols, rows) = caps.size()?;
        info!(target: "runtime.startup", cols, rows, "terminal_ready");

        let mut guard = TerminalGuard::enter(&mut backend)?;
        let mut session = Session::new(options, candidates, cols, rows);
        session.refresh(&input);

        let outcome = loop {
            renderer.draw(&session, guard.writer())?;
            let event = match input.next_event(&decoder) {
                Ok(event) => event,
                Err(InputError::Eof) => {
                    debug!(target: "runtime", "tty_eof");
                    Event::Interrupt
                }
                Err(err) => return Err(err.into()),
            };
            match session.handle(event, &input) {
                Control::Continue => {}
                Control::Resize => {
                    let (cols, rows) = caps.size()?;
                    session.resize(cols, rows);
                }
                Control::Suspend => {
                    guard.suspend()?;
                    let (cols, rows) = caps.size()?;
                    session.resize(cols, rows);
                }
                Control::Finish(outcome) => break outcome,
            }
        };
        drop(guard);
        Ok((outcome, session))
    }
}
