//! Controlling-terminal event source.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, Read};
use std::os::fd::{AsRawFd, RawFd};
use std::sync::atomic::Ordering;

use core_events::{Event, InputProbe, RESIZES};

use crate::decoder::KeyDecoder;
use crate::signals::SignalPipe;
use crate::{ByteSource, InputError};

/// Reads key bytes from the tty and notifications from the signal pipes.
///
/// Bytes are read in small chunks and buffered; [`InputProbe::input_pending`] accounts
/// for the buffer as well as the descriptors, so a filter pass never misses a keystroke
/// that was already pulled out of the kernel.
pub struct TtyInput {
    tty: File,
    buffered: VecDeque<u8>,
    resize: SignalPipe,
    interrupt: SignalPipe,
}

impl TtyInput {
    pub fn new(tty: File, resize: SignalPipe, interrupt: SignalPipe) -> Self {
        Self {
            tty,
            buffered: VecDeque::with_capacity(64),
            resize,
            interrupt,
        }
    }

    /// Open `/dev/tty` for reading and register the default signal set.
    pub fn open() -> Result<Self, InputError> {
        let tty = File::open("/dev/tty")?;
        Ok(Self::new(tty, SignalPipe::resize()?, SignalPipe::interrupt()?))
    }

    /// Block until the next event. Interrupts take priority over buffered keys; resize
    /// notifications are coalesced into one event.
    pub fn next_event(&mut self, decoder: &KeyDecoder) -> Result<Event, InputError> {
        loop {
            if self.interrupt.drain()? {
                tracing::debug!(target: "input.signal", "interrupt_signal");
                return Ok(Event::Interrupt);
            }
            if self.resize.drain()? {
                RESIZES.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(target: "input.signal", "resize_signal");
                return Ok(Event::Resize);
            }
            if !self.buffered.is_empty() {
                return decoder.decode(self);
            }
            let ready = poll_readable(&self.fds(), -1)?;
            if ready[0] {
                self.fill()?;
            }
        }
    }

    fn fds(&self) -> [RawFd; 3] {
        [
            self.tty.as_raw_fd(),
            self.resize.as_raw_fd(),
            self.interrupt.as_raw_fd(),
        ]
    }

    fn fill(&mut self) -> Result<(), InputError> {
        let mut chunk = [0u8; 64];
        loop {
            match self.tty.read(&mut chunk) {
                Ok(0) => return Err(InputError::Eof),
                Ok(n) => {
                    self.buffered.extend(&chunk[..n]);
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Waits on the signal pipes as well as the tty. Tty bytes win when both are ready so an
/// escape sequence is not split; otherwise a pending signal ends the wait with
/// [`InputError::Interrupted`] and stays queued for [`TtyInput::next_event`].
impl ByteSource for TtyInput {
    fn next_byte(&mut self) -> Result<u8, InputError> {
        while self.buffered.is_empty() {
            let ready = poll_readable(&self.fds(), -1)?;
            if ready[0] {
                self.fill()?;
            } else if ready[1] || ready[2] {
                return Err(InputError::Interrupted);
            }
        }
        self.buffered.pop_front().ok_or(InputError::Eof)
    }
}

impl InputProbe for TtyInput {
    fn input_pending(&self) -> bool {
        if !self.buffered.is_empty() {
            return true;
        }
        poll_readable(&self.fds(), 0).is_ok_and(|ready| ready.iter().any(|&r| r))
    }
}

/// `poll(2)` for readability. `timeout_ms < 0` blocks; `EINTR` reports nothing ready.
pub(crate) fn poll_readable(fds: &[RawFd], timeout_ms: libc::c_int) -> io::Result<Vec<bool>> {
    let mut pollfds: Vec<libc::pollfd> = fds
        .iter()
        .map(|&fd| libc::pollfd {
            fd,
            events: libc::POLLIN,
            revents: 0,
        })
        .collect();
    // SAFETY: `pollfds` is a live, correctly sized buffer for the duration of the call.
    let rc = unsafe {
        libc::poll(
            pollfds.as_mut_ptr(),
            pollfds.len() as libc::nfds_t,
            timeout_ms,
        )
    };
    if rc < 0 {
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::Interrupted {
            return Ok(vec![false; fds.len()]);
        }
        return Err(err);
    }
    Ok(pollfds
        .iter()
        .map(|p| p.revents & (libc::POLLIN | libc::POLLHUP | libc::POLLERR) != 0)
        .collect())
}
