//! Logical events consumed by the selection loop.
//!
//! Key bytes decoded from the tty and signal notifications (resize, interrupt) are
//! folded into one tagged union so the controller has a single consumption point.

use std::sync::atomic::{AtomicU64, Ordering};

// -------------------------------------------------------------------------------------------------
// Telemetry
// -------------------------------------------------------------------------------------------------
// Relaxed counters, bumped by the decoder and filter scheduler. Read back through
// `TelemetrySnapshot` at shutdown and in tests.
// -------------------------------------------------------------------------------------------------
pub static KEYS_DECODED: AtomicU64 = AtomicU64::new(0);
pub static UNKNOWN_SEQUENCES: AtomicU64 = AtomicU64::new(0); // escape runs drained without a match
pub static FILTER_PASSES: AtomicU64 = AtomicU64::new(0);
pub static FILTER_ABORTS: AtomicU64 = AtomicU64::new(0);
pub static CANDIDATES_SCORED: AtomicU64 = AtomicU64::new(0);
pub static CANDIDATES_SKIPPED: AtomicU64 = AtomicU64::new(0); // left at zero by the growth shortcut
pub static RESIZES: AtomicU64 = AtomicU64::new(0);

/// Logical event produced by the key decoder or the signal pipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    Key(Key),
    /// Terminal geometry changed. Bursts are coalesced before delivery.
    Resize,
    /// Interrupt request (Ctrl-C byte or SIGINT/SIGTERM/SIGHUP).
    Interrupt,
    /// Job-control suspend (Ctrl-Z byte).
    Suspend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    /// Accept the raw query text as the result.
    AltEnter,
    Backspace,
    Delete,
    WordErase,
    KillBefore,
    KillAfter,
    Left,
    Right,
    LineStart,
    LineEnd,
    Up,
    Down,
    PageUp,
    PageDown,
    ListHome,
    ListEnd,
    Printable(char),
    /// Bytes that never resolved to a known key or a printable codepoint.
    Unknown,
}

impl Key {
    /// Stable name for log fields. Printable keys never expose the codepoint.
    pub fn name(&self) -> &'static str {
        match self {
            Key::Enter => "enter",
            Key::AltEnter => "alt_enter",
            Key::Backspace => "backspace",
            Key::Delete => "delete",
            Key::WordErase => "word_erase",
            Key::KillBefore => "kill_before",
            Key::KillAfter => "kill_after",
            Key::Left => "left",
            Key::Right => "right",
            Key::LineStart => "line_start",
            Key::LineEnd => "line_end",
            Key::Up => "up",
            Key::Down => "down",
            Key::PageUp => "page_up",
            Key::PageDown => "page_down",
            Key::ListHome => "list_home",
            Key::ListEnd => "list_end",
            Key::Printable(_) => "printable",
            Key::Unknown => "unknown",
        }
    }

    /// True for keys that change the query text.
    pub fn edits_query(&self) -> bool {
        matches!(
            self,
            Key::Printable(_)
                | Key::Backspace
                | Key::Delete
                | Key::WordErase
                | Key::KillBefore
                | Key::KillAfter
        )
    }
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Key(k) => k.name(),
            Event::Resize => "resize",
            Event::Interrupt => "interrupt",
            Event::Suspend => "suspend",
        }
    }
}

/// Non-blocking "is newer input already waiting" check.
///
/// Implementations must not consume anything; a `true` answer only means the next read
/// will not block.
pub trait InputProbe {
    fn input_pending(&self) -> bool;
}

/// Probe that never reports pending input. Filter passes driven by it always complete.
pub struct NeverPending;

impl InputProbe for NeverPending {
    fn input_pending(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TelemetrySnapshot {
    pub keys_decoded: u64,
    pub unknown_sequences: u64,
    pub filter_passes: u64,
    pub filter_aborts: u64,
    pub candidates_scored: u64,
    pub candidates_skipped: u64,
    pub resizes: u64,
}

impl TelemetrySnapshot {
    pub fn capture() -> Self {
        Self {
            keys_decoded: KEYS_DECODED.load(Ordering::Relaxed),
            unknown_sequences: UNKNOWN_SEQUENCES.load(Ordering::Relaxed),
            filter_passes: FILTER_PASSES.load(Ordering::Relaxed),
            filter_aborts: FILTER_ABORTS.load(Ordering::Relaxed),
            candidates_scored: CANDIDATES_SCORED.load(Ordering::Relaxed),
            candidates_skipped: CANDIDATES_SKIPPED.load(Ordering::Relaxed),
            resizes: RESIZES.load(Ordering::Relaxed),
        }
    }

    /// Emit the counters as one structured `runtime` event.
    pub fn log(&self) {
        tracing::info!(
            target: "runtime",
            keys_decoded = self.keys_decoded,
            unknown_sequences = self.unknown_sequences,
            filter_passes = self.filter_passes,
            filter_aborts = self.filter_aborts,
            candidates_scored = self.candidates_scored,
            candidates_skipped = self.candidates_skipped,
            resizes = self.resizes,
            "telemetry"
        );
    }
}
