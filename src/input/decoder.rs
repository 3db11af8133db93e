//! Key Decoder: turns the raw input byte stream into logical key events.
//!
//! Byte classification is a pure state machine ([`KeyParser`]) so new sequences can be
//! added without touching edit semantics; [`KeyDecoder`] only feeds it one byte per
//! blocking read. Which plain bytes count as printable is decided per prompt through
//! an acceptance predicate.

use crate::error::{PromptError, Result};
use log::trace;
use std::io::{self, Read};

pub const DEL: u8 = 0x7f;
pub const BS: u8 = 0x08;
pub const ESC: u8 = 0x1b;

/// Logical key event produced by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Printable(u8),
    Backspace,
    Enter,
    ArrowUp,
    ArrowDown,
    /// Unknown escape sequence or a byte the prompt does not accept
    Unrecognized,
}

/// Acceptance predicate for numeric prompts.
pub fn digits_only(byte: u8) -> bool {
    byte.is_ascii_digit()
}

/// Acceptance predicate for masked and free-text prompts.
pub fn any_byte(_byte: u8) -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ParseState {
    #[default]
    Ground,
    /// ESC seen; waiting for the second byte
    Escape,
    /// ESC and one more byte seen; `csi` records whether it was `[`
    EscapeFinal { csi: bool },
}

/// Byte-at-a-time escape sequence state machine.
#[derive(Debug, Clone, Default)]
pub struct KeyParser {
    state: ParseState,
}

impl KeyParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while in the middle of an escape sequence.
    pub fn is_pending(&self) -> bool {
        self.state != ParseState::Ground
    }

    /// Feed one byte; returns an event once a key is complete.
    ///
    /// An ESC always consumes exactly two further bytes, whatever they are.
    pub fn feed(&mut self, byte: u8, accept: impl Fn(u8) -> bool) -> Option<KeyEvent> {
        match self.state {
            ParseState::Ground => match byte {
                DEL | BS => Some(KeyEvent::Backspace),
                b'\n' | b'\r' => Some(KeyEvent::Enter),
                ESC => {
                    self.state = ParseState::Escape;
                    None
                }
                _ if accept(byte) => Some(KeyEvent::Printable(byte)),
                _ => Some(KeyEvent::Unrecognized),
            },
            ParseState::Escape => {
                self.state = ParseState::EscapeFinal { csi: byte == b'[' };
                None
            }
            ParseState::EscapeFinal { csi } => {
                self.state = ParseState::Ground;
                Some(match (csi, byte) {
                    (true, b'A') => KeyEvent::ArrowUp,
                    (true, b'B') => KeyEvent::ArrowDown,
                    _ => KeyEvent::Unrecognized,
                })
            }
        }
    }
}

/// Blocking decoder over a raw, unbuffered-by-line byte stream.
pub struct KeyDecoder<R: Read> {
    input: R,
    parser: KeyParser,
}

impl<R: Read> KeyDecoder<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            parser: KeyParser::new(),
        }
    }

    pub fn into_inner(self) -> R {
        self.input
    }

    /// Block until the next complete key event.
    ///
    /// Fails with [`PromptError::InputClosed`] when the stream ends, including in the
    /// middle of an escape sequence.
    pub fn next_event(&mut self, accept: impl Fn(u8) -> bool) -> Result<KeyEvent> {
        loop {
            let byte = self.read_byte()?;
            if let Some(event) = self.parser.feed(byte, &accept) {
                trace!("decoded {byte:#04x} as {event:?}");
                return Ok(event);
            }
        }
    }

    fn read_byte(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        loop {
            match self.input.read(&mut byte) {
                Ok(0) => return Err(PromptError::InputClosed),
                Ok(_) => return Ok(byte[0]),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(PromptError::io("failed to read input", err)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(bytes: &[u8], accept: fn(u8) -> bool) -> Vec<KeyEvent> {
        let mut decoder = KeyDecoder::new(bytes);
        let mut events = Vec::new();
        loop {
            match decoder.next_event(accept) {
                Ok(event) => events.push(event),
                Err(PromptError::InputClosed) => return events,
                Err(err) => panic!("unexpected error: {err}"),
            }
        }
    }

    #[test]
    fn control_bytes_take_priority() {
        assert_eq!(
            decode_all(b"\x7f\x08\n\r", any_byte),
            vec![
                KeyEvent::Backspace,
                KeyEvent::Backspace,
                KeyEvent::Enter,
                KeyEvent::Enter
            ]
        );
    }

    #[test]
    fn arrow_sequences() {
        assert_eq!(
            decode_all(b"\x1b[A\x1b[B", digits_only),
            vec![KeyEvent::ArrowUp, KeyEvent::ArrowDown]
        );
    }

    #[test]
    fn unknown_sequences_consume_two_bytes() {
        // ESC [ C (right arrow) and ESC O A (SS3 up) are both dropped whole.
        assert_eq!(
            decode_all(b"\x1b[C\x1bOA7", digits_only),
            vec![
                KeyEvent::Unrecognized,
                KeyEvent::Unrecognized,
                KeyEvent::Printable(b'7')
            ]
        );
    }

    #[test]
    fn acceptance_is_per_prompt() {
        assert_eq!(
            decode_all(b"a1", digits_only),
            vec![KeyEvent::Unrecognized, KeyEvent::Printable(b'1')]
        );
        assert_eq!(
            decode_all(b"a1", any_byte),
            vec![KeyEvent::Printable(b'a'), KeyEvent::Printable(b'1')]
        );
    }

    #[test]
    fn parser_tracks_pending_escape() {
        let mut parser = KeyParser::new();
        assert_eq!(parser.feed(ESC, any_byte), None);
        assert!(parser.is_pending());
        assert_eq!(parser.feed(b'[', any_byte), None);
        assert_eq!(parser.feed(b'B', any_byte), Some(KeyEvent::ArrowDown));
        assert!(!parser.is_pending());
    }

    #[test]
    fn eof_mid_sequence_closes_input() {
        let mut decoder = KeyDecoder::new(&b"\x1b["[..]);
        assert!(matches!(
            decoder.next_event(any_byte),
            Err(PromptError::InputClosed)
        ));
    }

    #[test]
    fn interrupted_reads_are_retried() {
        struct Flaky {
            interrupted: bool,
        }

        impl Read for Flaky {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                if !self.interrupted {
                    self.interrupted = true;
                    return Err(io::Error::new(io::ErrorKind::Interrupted, "signal"));
                }
                buf[0] = b'x';
                Ok(1)
            }
        }

        let mut decoder = KeyDecoder::new(Flaky { interrupted: false });
        assert_eq!(
            decoder.next_event(any_byte).unwrap(),
            KeyEvent::Printable(b'x')
        );
    }
}
