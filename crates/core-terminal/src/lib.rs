//! Terminal backend: raw mode, alternate screen, job-control suspend.
//!
//! Output goes to the controlling tty rather than stdout, which carries the result.
//! [`TerminalGuard`] restores the terminal on every exit path, including unwinding.

use std::io::Write;
use std::ops::{Deref, DerefMut};

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use signal_hook::consts::SIGTSTP;

pub mod capabilities;
mod error;

pub use capabilities::{
    Capability, CapabilityProvider, KeyCapability, TerminalCapabilities, check_required,
};
pub use error::TerminalError;

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<(), TerminalError>;
    fn leave(&mut self) -> Result<(), TerminalError>;

    /// Detach, stop with the default `SIGTSTP` disposition, and reattach once resumed.
    fn suspend(&mut self) -> Result<(), TerminalError> {
        self.leave()?;
        stop_process()?;
        self.enter()
    }
}

/// Deliver `SIGTSTP` as if no handler were installed. Returns after `SIGCONT`.
pub fn stop_process() -> Result<(), TerminalError> {
    tracing::debug!(target: "terminal", "process_stop");
    signal_hook::low_level::emulate_default_handler(SIGTSTP)?;
    tracing::debug!(target: "terminal", "process_resume");
    Ok(())
}

pub struct TtyBackend<W: Write> {
    out: W,
    clear_eos: String,
    alt_screen: Option<(String, String)>,
    raw_mode: bool,
    entered: bool,
}

impl<W: Write> TtyBackend<W> {
    pub fn new(
        out: W,
        caps: &dyn CapabilityProvider,
        alternate_screen: bool,
    ) -> Result<Self, TerminalError> {
        let clear_eos = caps.require(Capability::ClearToEndOfScreen)?.to_owned();
        let alt_screen = if alternate_screen {
            Some((
                caps.require(Capability::EnterAltScreen)?.to_owned(),
                caps.require(Capability::ExitAltScreen)?.to_owned(),
            ))
        } else {
            None
        };
        Ok(Self {
            out,
            clear_eos,
            alt_screen,
            raw_mode: true,
            entered: false,
        })
    }

    /// Leave the tty line discipline alone (output-only use, tests).
    pub fn without_raw_mode(mut self) -> Self {
        self.raw_mode = false;
        self
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }

    #[cfg(test)]
    fn is_entered(&self) -> bool {
        self.entered
    }

    #[cfg(test)]
    fn into_inner(mut self) -> W
    where
        W: Default,
    {
        let _ = self.leave();
        std::mem::take(&mut self.out)
    }
}

impl<W: Write> TerminalBackend for TtyBackend<W> {
    fn enter(&mut self) -> Result<(), TerminalError> {
        if self.entered {
            return Ok(());
        }
        if self.raw_mode {
            enable_raw_mode()?;
        }
        self.entered = true;
        if let Some((enter, _)) = &self.alt_screen {
            self.out.write_all(enter.as_bytes())?;
        }
        self.out.flush()?;
        tracing::debug!(
            target: "terminal",
            alternate_screen = self.alt_screen.is_some(),
            raw_mode = self.raw_mode,
            "terminal_enter"
        );
        Ok(())
    }

    fn leave(&mut self) -> Result<(), TerminalError> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        let mut restore = Vec::with_capacity(16);
        restore.push(b'\r');
        restore.extend_from_slice(self.clear_eos.as_bytes());
        if let Some((_, exit)) = &self.alt_screen {
            restore.extend_from_slice(exit.as_bytes());
        }
        let written = self
            .out
            .write_all(&restore)
            .and_then(|()| self.out.flush());
        // Raw mode is dropped even when the restore bytes could not be written.
        if self.raw_mode {
            disable_raw_mode()?;
        }
        tracing::debug!(target: "terminal", "terminal_leave");
        written.map_err(TerminalError::from)
    }
}

impl<W: Write> Drop for TtyBackend<W> {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

/// Leaves the backend when dropped.
pub struct TerminalGuard<'a, B: TerminalBackend> {
    backend: &'a mut B,
}

impl<'a, B: TerminalBackend> TerminalGuard<'a, B> {
    pub fn enter(backend: &'a mut B) -> Result<Self, TerminalError> {
        backend.enter()?;
        Ok(Self { backend })
    }
}

impl<B: TerminalBackend> Deref for TerminalGuard<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.backend
    }
}

impl<B: TerminalBackend> DerefMut for TerminalGuard<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        self.backend
    }
}

impl<B: TerminalBackend> Drop for TerminalGuard<'_, B> {
    fn drop(&mut self) {
        if let Err(err) = self.backend.leave() {
            tracing::warn!(target: "terminal", error = %err, "terminal_restore_failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(alt: bool) -> TtyBackend<Vec<u8>> {
        let caps = TerminalCapabilities::xterm();
        TtyBackend::new(Vec::new(), &caps, alt)
            .unwrap()
            .without_raw_mode()
    }

    #[test]
    fn inline_enter_writes_nothing_and_leave_clears_below() {
        let mut b = backend(false);
        b.enter().unwrap();
        assert!(b.writer().is_empty());
        b.leave().unwrap();
        assert_eq!(b.writer().as_slice(), b"\r\x1b[J");
    }

    #[test]
    fn alternate_screen_round_trip() {
        let mut b = backend(true);
        b.enter().unwrap();
        b.enter().unwrap();
        b.leave().unwrap();
        b.leave().unwrap();
        assert_eq!(
            String::from_utf8_lossy(b.writer()),
            "\x1b[?1049h\r\x1b[J\x1b[?1049l"
        );
    }

    #[test]
    fn guard_restores_on_drop() {
        let mut b = backend(false);
        {
            let mut guard = TerminalGuard::enter(&mut b).unwrap();
            assert!(guard.is_entered());
            guard.writer().extend_from_slice(b"frame");
        }
        assert!(!b.is_entered());
        assert_eq!(b.writer().as_slice(), b"frame\r\x1b[J");
    }

    #[test]
    fn guard_restores_during_unwind() {
        let mut b = backend(false);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = TerminalGuard::enter(&mut b).unwrap();
            panic!("boom");
        }));
        assert!(result.is_err());
        assert!(!b.is_entered());
    }

    #[test]
    fn missing_alt_screen_is_reported_at_construction() {
        let caps = TerminalCapabilities::default();
        let err = TtyBackend::new(Vec::new(), &caps, true).err();
        assert!(matches!(err, Some(TerminalError::MissingCapability("ed"))));
    }

    #[test]
    fn into_inner_leaves_first() {
        let mut b = backend(false);
        b.enter().unwrap();
        let out = b.into_inner();
        assert_eq!(out, b"\r\x1b[J");
    }
}
