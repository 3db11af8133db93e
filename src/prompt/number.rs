//! Numeric stepper prompt.
//!
//! Accepts digits only, re-validates after every change to the buffer, and steps
//! the value with the up/down arrows. Enter is ignored while the validator rejects
//! the current value.

use super::editor::LineEditor;
use super::state::LoopState;
use crate::error::Result;
use crate::input::{digits_only, EditBuffer, KeyDecoder, KeyEvent};
use crate::render::{Renderer, Theme};
use crate::terminal::{ModeControl, RawModeGuard, SystemTerminal};
use crate::validate::{self, BoxedValidator, ValidationOutcome, Validator};
use log::debug;
use std::io::{self, Read, Write};

/// Default cap on typed digits.
pub const DEFAULT_MAX_DIGITS: usize = 10;

/// Largest cap whose every value still fits in a `u64`.
pub const MAX_SUPPORTED_DIGITS: usize = 19;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Up,
    Down,
}

/// Raw-mode prompt for a non-negative integer.
pub struct NumberPrompt<'a> {
    message: String,
    default: u64,
    max_digits: usize,
    validator: Option<BoxedValidator<'a, u64>>,
    theme: Theme,
}

impl<'a> NumberPrompt<'a> {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            default: 0,
            max_digits: DEFAULT_MAX_DIGITS,
            validator: None,
            theme: Theme::default(),
        }
    }

    /// Value returned (and validated) while the buffer is empty.
    pub fn default(mut self, value: u64) -> Self {
        self.default = value;
        self
    }

    /// Cap on typed digits, clamped to `1..=MAX_SUPPORTED_DIGITS`.
    pub fn max_digits(mut self, digits: usize) -> Self {
        self.max_digits = digits.clamp(1, MAX_SUPPORTED_DIGITS);
        self
    }

    pub fn validator<F, S>(self, validator: F) -> Self
    where
        F: Fn(&u64) -> S + 'a,
        S: Into<ValidationOutcome>,
    {
        self.validate_with(validator)
    }

    pub fn validate_with(mut self, validator: impl Validator<u64> + 'a) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Run on the controlling terminal.
    pub fn interact(self) -> Result<u64> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.interact_on(stdin.lock(), stdout.lock(), &mut SystemTerminal)
    }

    /// Run against arbitrary input/output, switching raw mode through `mode`.
    pub fn interact_on<R, W, M>(self, input: R, output: W, mode: &mut M) -> Result<u64>
    where
        R: Read,
        W: Write,
        M: ModeControl + ?Sized,
    {
        let mut decoder = KeyDecoder::new(input);
        let mut editor = LineEditor::new(
            Renderer::new(output, self.theme),
            EditBuffer::with_limit(self.max_digits),
            self.message.as_str(),
        );

        let guard = RawModeGuard::acquire(mode)?;
        editor.begin()?;

        let mut state = LoopState::Editing;
        while !state.is_done() {
            state = match state {
                LoopState::Editing => match decoder.next_event(digits_only)? {
                    KeyEvent::Printable(digit) => {
                        LoopState::after_edit(editor.append(digit, char::from(digit))?)
                    }
                    KeyEvent::Backspace => LoopState::after_edit(editor.backspace()?),
                    KeyEvent::ArrowUp => self.step(&mut editor, Step::Up)?,
                    KeyEvent::ArrowDown => self.step(&mut editor, Step::Down)?,
                    KeyEvent::Enter => LoopState::Validating { submitted: true },
                    KeyEvent::Unrecognized => LoopState::Editing,
                },
                LoopState::Validating { submitted } => {
                    let value = self.value_of(editor.buffer());
                    let outcome = validate::run(self.validator.as_ref(), &value);
                    debug!("validated {value}: {outcome}");
                    editor.apply_validation(&outcome)?;
                    LoopState::after_validation(outcome.is_valid(), submitted)
                }
                LoopState::Done => LoopState::Done,
            };
            editor.flush()?;
        }

        guard.release()?;
        let value = self.value_of(editor.buffer());
        editor.finish(&value.to_string())?;
        Ok(value)
    }

    /// Value the buffer currently stands for.
    fn value_of(&self, buffer: &EditBuffer) -> u64 {
        parse_digits(buffer.as_bytes()).unwrap_or(self.default)
    }

    /// Largest value expressible within the digit cap.
    fn ceiling(&self) -> u64 {
        10u64
            .checked_pow(self.max_digits as u32)
            .map_or(u64::MAX, |bound| bound - 1)
    }

    fn step<W: Write>(&self, editor: &mut LineEditor<W>, step: Step) -> Result<LoopState> {
        let current = parse_digits(editor.buffer().as_bytes()).unwrap_or(0);
        let next = match step {
            Step::Up => current.saturating_add(1).min(self.ceiling()),
            Step::Down => current.saturating_sub(1),
        };
        editor.replace_line(next.to_string().as_bytes())?;
        Ok(LoopState::Validating { submitted: false })
    }
}

/// Parse a digit-only byte string; `None` when empty.
fn parse_digits(bytes: &[u8]) -> Option<u64> {
    if bytes.is_empty() {
        return None;
    }
    bytes.iter().try_fold(0u64, |acc, &byte| {
        acc.checked_mul(10)?
            .checked_add(u64::from(byte.checked_sub(b'0')?))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::Detached;

    fn run(prompt: NumberPrompt<'_>, keys: &[u8]) -> (u64, String) {
        let mut output = Vec::new();
        let value = prompt
            .interact_on(keys, &mut output, &mut Detached)
            .unwrap();
        (value, String::from_utf8(output).unwrap())
    }

    #[test]
    fn parse_digits_handles_empty_and_leading_zeros() {
        assert_eq!(parse_digits(b""), None);
        assert_eq!(parse_digits(b"007"), Some(7));
        assert_eq!(parse_digits(b"9999999999"), Some(9_999_999_999));
        assert_eq!(parse_digits(b"12a"), None);
    }

    #[test]
    fn empty_buffer_returns_default() {
        let (value, _) = run(NumberPrompt::new("n").default(42), b"\n");
        assert_eq!(value, 42);
    }

    #[test]
    fn digits_are_concatenated() {
        let (value, _) = run(NumberPrompt::new("n"), b"1024\n");
        assert_eq!(value, 1024);
    }

    #[test]
    fn ceiling_respects_cap() {
        assert_eq!(NumberPrompt::new("n").max_digits(2).ceiling(), 99);
        assert_eq!(
            NumberPrompt::new("n").max_digits(19).ceiling(),
            9_999_999_999_999_999_999
        );
        assert_eq!(NumberPrompt::new("n").max_digits(0).max_digits, 1);
    }

    #[test]
    fn arrow_up_saturates_at_ceiling() {
        let (value, _) = run(NumberPrompt::new("n").max_digits(2), b"99\x1b[A\n");
        assert_eq!(value, 99);
    }

    #[test]
    fn arrow_redraws_whole_line() {
        let (_, out) = run(NumberPrompt::new("n"), b"5\x1b[A\n");
        assert!(out.contains("\x1b[2K\r"));
        assert!(out.contains(" 6"));
    }

    #[test]
    fn validator_sees_default_for_empty_buffer() {
        let (value, out) = run(
            NumberPrompt::new("n")
                .default(3)
                .validator(|n: &u64| if *n == 3 { "" } else { "want 3" }),
            b"4\x7f\n",
        );
        assert_eq!(value, 3);
        assert_eq!(out.matches("want 3").count(), 1);
    }
}
