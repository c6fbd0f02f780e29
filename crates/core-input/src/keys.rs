//! Key sequence table.
//!
//! A small fixed table covers control characters and the common VT100/xterm escape
//! forms; capability-provided strings are appended after it. Lookup prefers an exact
//! match anywhere in the table over a longer entry that merely starts with the bytes read
//! so far.

use core_events::{Event, Key};
use core_terminal::{CapabilityProvider, KeyCapability};

const FIXED: &[(&[u8], Event)] = &[
    (b"\x1b\n", Event::Key(Key::AltEnter)),
    (b"\x1b\r", Event::Key(Key::AltEnter)),
    (b"\x08", Event::Key(Key::Backspace)),
    (b"\x7f", Event::Key(Key::Backspace)),
    (b"\x01", Event::Key(Key::LineStart)),
    (b"\x05", Event::Key(Key::LineEnd)),
    (b"\x0b", Event::Key(Key::KillAfter)),
    (b"\x15", Event::Key(Key::KillBefore)),
    (b"\x17", Event::Key(Key::WordErase)),
    (b"\x04", Event::Key(Key::Delete)),
    (b"\x1bO3~", Event::Key(Key::Delete)),
    (b"\x1b[3~", Event::Key(Key::Delete)),
    (b"\x0e", Event::Key(Key::Down)),
    (b"\x1bOB", Event::Key(Key::Down)),
    (b"\x1b[B", Event::Key(Key::Down)),
    (b"\n", Event::Key(Key::Enter)),
    (b"\r", Event::Key(Key::Enter)),
    (b"\x02", Event::Key(Key::Left)),
    (b"\x1bOD", Event::Key(Key::Left)),
    (b"\x1b[D", Event::Key(Key::Left)),
    (b"\x1b[6~", Event::Key(Key::PageDown)),
    (b"\x1b[5~", Event::Key(Key::PageUp)),
    (b"\x1b[1~", Event::Key(Key::ListHome)),
    (b"\x1b[7~", Event::Key(Key::ListHome)),
    (b"\x1b[H", Event::Key(Key::ListHome)),
    (b"\x1bOH", Event::Key(Key::ListHome)),
    (b"\x1b[4~", Event::Key(Key::ListEnd)),
    (b"\x1b[8~", Event::Key(Key::ListEnd)),
    (b"\x1b[F", Event::Key(Key::ListEnd)),
    (b"\x1bOF", Event::Key(Key::ListEnd)),
    (b"\x06", Event::Key(Key::Right)),
    (b"\x1bOC", Event::Key(Key::Right)),
    (b"\x1b[C", Event::Key(Key::Right)),
    (b"\x10", Event::Key(Key::Up)),
    (b"\x1bOA", Event::Key(Key::Up)),
    (b"\x1b[A", Event::Key(Key::Up)),
    (b"\x03", Event::Interrupt),
    (b"\x1a", Event::Suspend),
];

/// Result of matching the bytes read so far against the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Exact(Event),
    /// Some entry is longer and starts with these bytes; keep reading.
    Partial,
    None,
}

#[derive(Debug, Clone)]
pub struct KeyTable {
    entries: Vec<(Vec<u8>, Event)>,
}

impl Default for KeyTable {
    fn default() -> Self {
        Self::fixed()
    }
}

impl KeyTable {
    /// Only the built-in control and escape sequences.
    pub fn fixed() -> Self {
        Self {
            entries: FIXED.iter().map(|(s, e)| (s.to_vec(), *e)).collect(),
        }
    }

    /// Built-in table followed by the provider's key strings.
    pub fn with_capabilities(caps: &dyn CapabilityProvider) -> Self {
        let mut table = Self::fixed();
        for cap in KeyCapability::ALL {
            if let Some(s) = caps.key(cap).filter(|s| !s.is_empty()) {
                table.push(s.as_bytes(), Event::Key(key_for(cap)));
            }
        }
        table
    }

    pub fn push(&mut self, seq: &[u8], event: Event) {
        self.entries.push((seq.to_vec(), event));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, read: &[u8]) -> Lookup {
        if let Some((_, ev)) = self.entries.iter().find(|(s, _)| s.as_slice() == read) {
            return Lookup::Exact(*ev);
        }
        if self.entries.iter().any(|(s, _)| s.starts_with(read)) {
            return Lookup::Partial;
        }
        Lookup::None
    }
}

fn key_for(cap: KeyCapability) -> Key {
    match cap {
        KeyCapability::Up => Key::Up,
        KeyCapability::Down => Key::Down,
        KeyCapability::Left => Key::Left,
        KeyCapability::Right => Key::Right,
        KeyCapability::Home => Key::ListHome,
        KeyCapability::End => Key::ListEnd,
        KeyCapability::PageUp => Key::PageUp,
        KeyCapability::PageDown => Key::PageDown,
        KeyCapability::Delete => Key::Delete,
    }
}
