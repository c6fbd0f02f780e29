//! Signal self-pipes.
//!
//! Handlers only write a byte into a socket pair; the event loop polls the read ends
//! next to the tty and turns readiness into events. Draining a pipe collapses any
//! number of queued notifications into one.

use std::io::{self, Read};
use std::os::fd::{AsRawFd, RawFd};
use std::os::unix::net::UnixStream;

use signal_hook::SigId;
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM, SIGWINCH};
use signal_hook::low_level::pipe;

/// One read end fed by one or more signals.
#[derive(Debug)]
pub struct SignalPipe {
    read: UnixStream,
    ids: Vec<SigId>,
}

impl SignalPipe {
    /// Register `signals` so each delivery writes into a fresh pipe.
    pub fn register(signals: &[libc::c_int]) -> io::Result<Self> {
        let (read, write) = UnixStream::pair()?;
        read.set_nonblocking(true)?;
        let mut ids = Vec::with_capacity(signals.len());
        for &sig in signals {
            ids.push(pipe::register(sig, write.try_clone()?)?);
        }
        Ok(Self { read, ids })
    }

    /// `SIGWINCH`.
    pub fn resize() -> io::Result<Self> {
        Self::register(&[SIGWINCH])
    }

    /// `SIGINT`, `SIGTERM`, `SIGHUP`.
    pub fn interrupt() -> io::Result<Self> {
        Self::register(&[SIGINT, SIGTERM, SIGHUP])
    }

    /// Consume every queued notification. Returns true when at least one was pending.
    pub fn drain(&mut self) -> io::Result<bool> {
        let mut buf = [0u8; 64];
        let mut seen = false;
        loop {
            match self.read.read(&mut buf) {
                Ok(0) => return Ok(seen),
                Ok(_) => seen = true,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(seen),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl AsRawFd for SignalPipe {
    fn as_raw_fd(&self) -> RawFd {
        self.read.as_raw_fd()
    }
}

impl Drop for SignalPipe {
    fn drop(&mut self) {
        for id in self.ids.drain(..) {
            signal_hook::low_level::unregister(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_hook::consts::SIGUSR2;

    #[test]
    fn bursts_collapse_into_one_drain() {
        let mut p = SignalPipe::register(&[SIGUSR2]).unwrap();
        assert!(!p.drain().unwrap());
        for _ in 0..5 {
            signal_hook::low_level::raise(SIGUSR2).unwrap();
        }
        assert!(p.drain().unwrap());
        assert!(!p.drain().unwrap());
    }
}
