use std::sync::atomic::Ordering;

use core_events::{Event, KEYS_DECODED, Key, UNKNOWN_SEQUENCES};
use core_text::utf8_len;

use crate::keys::{KeyTable, Lookup};
use crate::{ByteSource, InputError};

const ESC: u8 = 0x1b;

/// Decodes one logical event per call, consuming one or more bytes.
///
/// * Bytes are accumulated while some table entry still starts with them.
/// * An unmatched `ESC [` / `ESC O` sequence is drained up to its final byte
///   (`@`..=`~`) so the next read starts on a fresh key.
/// * A UTF-8 lead byte pulls in as many continuation bytes as it announces; the result
///   is a printable event unless it is invalid or a control codepoint.
/// * A sequence cut short by [`InputError::Interrupted`] decodes as [`Key::Unknown`];
///   the signal itself is reported by the source on the next call.
#[derive(Debug, Clone, Default)]
pub struct KeyDecoder {
    table: KeyTable,
}

impl KeyDecoder {
    pub fn new(table: KeyTable) -> Self {
        Self { table }
    }

    pub fn decode<S: ByteSource + ?Sized>(&self, src: &mut S) -> Result<Event, InputError> {
        let mut buf: Vec<u8> = Vec::with_capacity(8);
        buf.push(src.next_byte()?);
        let event = match self.decode_rest(&mut buf, src) {
            Err(InputError::Interrupted) => {
                UNKNOWN_SEQUENCES.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(
                    target: "input.decode",
                    bytes = buf.len(),
                    "partial_sequence_interrupted"
                );
                Event::Key(Key::Unknown)
            }
            other => other?,
        };
        KEYS_DECODED.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(
            target: "input.decode",
            key = event.name(),
            bytes = buf.len(),
            "key_decoded"
        );
        Ok(event)
    }

    fn decode_rest<S: ByteSource + ?Sized>(
        &self,
        buf: &mut Vec<u8>,
        src: &mut S,
    ) -> Result<Event, InputError> {
        loop {
            match self.table.lookup(buf) {
                Lookup::Exact(ev) => return Ok(ev),
                Lookup::Partial => buf.push(src.next_byte()?),
                Lookup::None => return self.resolve_unmatched(buf, src).map(Event::Key),
            }
        }
    }

    fn resolve_unmatched<S: ByteSource + ?Sized>(
        &self,
        buf: &mut Vec<u8>,
        src: &mut S,
    ) -> Result<Key, InputError> {
        if buf.len() > 1 && buf[0] == ESC && matches!(buf[1], b'[' | b'O') {
            let mut last = buf[buf.len() - 1];
            while !(b'@'..=b'~').contains(&last) {
                last = src.next_byte()?;
                buf.push(last);
            }
            UNKNOWN_SEQUENCES.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(
                target: "input.decode",
                bytes = buf.len(),
                "unknown_sequence_drained"
            );
            return Ok(Key::Unknown);
        }

        let lead = buf[0];
        let need = utf8_len(lead);
        if need == 1 {
            return Ok(if buf.len() == 1 && (0x20..0x7f).contains(&lead) {
                Key::Printable(char::from(lead))
            } else {
                Key::Unknown
            });
        }
        if need == 0 {
            return Ok(Key::Unknown);
        }
        while buf.len() < need {
            buf.push(src.next_byte()?);
        }
        let key = std::str::from_utf8(buf)
            .ok()
            .and_then(|s| s.chars().next())
            .filter(|c| !c.is_control())
            .map_or(Key::Unknown, Key::Printable);
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    fn decode_all(bytes: &[u8]) -> Vec<Event> {
        let decoder = KeyDecoder::default();
        let mut src: VecDeque<u8> = bytes.iter().copied().collect();
        let mut out = Vec::new();
        while !src.is_empty() {
            match decoder.decode(&mut src) {
                Ok(ev) => out.push(ev),
                Err(InputError::Eof) => break,
                Err(e) => panic!("unexpected error {e}"),
            }
        }
        out
    }

    #[test]
    fn ascii_printable() {
        assert_eq!(decode_all(b"a~ "), vec![
            Event::Key(Key::Printable('a')),
            Event::Key(Key::Printable('~')),
            Event::Key(Key::Printable(' ')),
        ]);
    }

    #[test]
    fn multibyte_codepoints_are_whole() {
        assert_eq!(decode_all("é界😀".as_bytes()), vec![
            Event::Key(Key::Printable('é')),
            Event::Key(Key::Printable('界')),
            Event::Key(Key::Printable('😀')),
        ]);
    }

    #[test]
    fn stray_continuation_and_control_bytes_are_unknown() {
        assert_eq!(decode_all(&[0x80, 0x00, 0x1f]), vec![Event::Key(Key::Unknown); 3]);
    }

    #[test]
    fn invalid_continuation_is_unknown() {
        assert_eq!(decode_all(&[0xC3, b'a']), vec![Event::Key(Key::Unknown)]);
    }

    /// Yields its bytes, then reports a pending signal.
    struct CutShort(VecDeque<u8>);

    impl ByteSource for CutShort {
        fn next_byte(&mut self) -> Result<u8, InputError> {
            self.0.pop_front().ok_or(InputError::Interrupted)
        }
    }

    #[test]
    fn sequence_cut_by_signal_is_unknown() {
        let decoder = KeyDecoder::default();
        let cases: [&[u8]; 4] = [b"\x1b", b"\x1b[", b"\x1b[1;", &[0xE7, 0x95]];
        for bytes in cases {
            let mut src = CutShort(bytes.iter().copied().collect());
            assert_eq!(decoder.decode(&mut src).unwrap(), Event::Key(Key::Unknown));
            assert!(src.0.is_empty());
        }
    }

    #[test]
    fn signal_before_first_byte_is_reported() {
        let decoder = KeyDecoder::default();
        let mut src = CutShort(VecDeque::new());
        assert!(matches!(decoder.decode(&mut src), Err(InputError::Interrupted)));
    }

    #[test]
    fn truncated_codepoint_reports_eof() {
        let decoder = KeyDecoder::default();
        let mut src: VecDeque<u8> = [0xE7u8, 0x95].into_iter().collect();
        assert!(matches!(decoder.decode(&mut src), Err(InputError::Eof)));
    }
}
