//! Terminal input: key decoding and the tty/signal event source.
//!
//! [`KeyDecoder`] turns raw bytes into [`Event`]s by table lookup. [`TtyInput`] reads the
//! controlling terminal and folds signal notifications (resize, interrupt) into the same
//! stream, so the selection loop has a single consumption point.

use std::collections::VecDeque;
use std::io;

use thiserror::Error;

mod decoder;
mod keys;
mod signals;
mod tty;

pub use core_events::{Event, Key};
pub use decoder::KeyDecoder;
pub use keys::{KeyTable, Lookup};
pub use signals::SignalPipe;
pub use tty::TtyInput;

#[derive(Debug, Error)]
pub enum InputError {
    /// The byte source is exhausted (terminal hung up).
    #[error("end of input")]
    Eof,
    /// A signal notification arrived while a key sequence was still incomplete.
    #[error("input interrupted by a signal")]
    Interrupted,
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Blocking source of raw input bytes.
pub trait ByteSource {
    fn next_byte(&mut self) -> Result<u8, InputError>;
}

impl ByteSource for VecDeque<u8> {
    fn next_byte(&mut self) -> Result<u8, InputError> {
        self.pop_front().ok_or(InputError::Eof)
    }
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    fn next_byte(&mut self) -> Result<u8, InputError> {
        (**self).next_byte()
    }
}
