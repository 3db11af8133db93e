//! Masked (password) prompt.
//!
//! Every byte other than backspace, Enter and escape sequences is accepted and echoed
//! as the mask glyph. Validation only happens when Enter is pressed.

use super::editor::LineEditor;
use super::state::LoopState;
use crate::error::Result;
use crate::input::{any_byte, EditBuffer, KeyDecoder, KeyEvent};
use crate::render::{Renderer, Theme};
use crate::terminal::{ModeControl, RawModeGuard, SystemTerminal};
use crate::validate::{self, BoxedValidator, ValidationOutcome, Validator};
use log::debug;
use std::io::{self, Read, Write};

/// Message shown when a required field is submitted blank.
pub const REQUIRED_MESSAGE: &str = "This field is required";

/// Raw-mode prompt that never echoes what is typed.
pub struct MaskedPrompt<'a> {
    message: String,
    mask: char,
    required: bool,
    validator: Option<BoxedValidator<'a, str>>,
    theme: Theme,
}

impl<'a> MaskedPrompt<'a> {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            mask: '*',
            required: false,
            validator: None,
            theme: Theme::default(),
        }
    }

    pub fn mask(mut self, mask: char) -> Self {
        self.mask = mask;
        self
    }

    /// Refuse blank submissions with [`REQUIRED_MESSAGE`].
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn validator<F, S>(self, validator: F) -> Self
    where
        F: Fn(&str) -> S + 'a,
        S: Into<ValidationOutcome>,
    {
        self.validate_with(validator)
    }

    pub fn validate_with(mut self, validator: impl Validator<str> + 'a) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Run on the controlling terminal.
    pub fn interact(self) -> Result<String> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.interact_on(stdin.lock(), stdout.lock(), &mut SystemTerminal)
    }

    /// Run against arbitrary input/output, switching raw mode through `mode`.
    pub fn interact_on<R, W, M>(self, input: R, output: W, mode: &mut M) -> Result<String>
    where
        R: Read,
        W: Write,
        M: ModeControl + ?Sized,
    {
        let mut decoder = KeyDecoder::new(input);
        let mut editor = LineEditor::new(
            Renderer::new(output, self.theme),
            EditBuffer::new(),
            self.message.as_str(),
        );

        let guard = RawModeGuard::acquire(mode)?;
        editor.begin()?;

        let mut state = LoopState::Editing;
        while !state.is_done() {
            state = match state {
                LoopState::Editing => match decoder.next_event(any_byte)? {
                    KeyEvent::Printable(byte) => {
                        editor.append(byte, self.mask)?;
                        LoopState::Editing
                    }
                    KeyEvent::Backspace => {
                        editor.backspace()?;
                        LoopState::Editing
                    }
                    KeyEvent::Enter => LoopState::Validating { submitted: true },
                    KeyEvent::ArrowUp | KeyEvent::ArrowDown | KeyEvent::Unrecognized => {
                        LoopState::Editing
                    }
                },
                LoopState::Validating { submitted } => self.submit(&mut editor, submitted)?,
                LoopState::Done => LoopState::Done,
            };
            editor.flush()?;
        }

        guard.release()?;
        let value = editor.buffer().to_string_lossy();
        let masked: String = std::iter::repeat(self.mask)
            .take(editor.buffer().len())
            .collect();
        editor.finish(&masked)?;
        Ok(value)
    }

    /// Required check first, then the validator. Both report through a one-shot
    /// error line: re-submitting the same failure does not redraw it.
    fn submit<W: Write>(
        &self,
        editor: &mut LineEditor<W>,
        submitted: bool,
    ) -> Result<LoopState> {
        if self.required && editor.buffer().is_blank() {
            debug!("required field submitted blank");
            editor.show_error_once(REQUIRED_MESSAGE)?;
            return Ok(LoopState::Editing);
        }

        let value = editor.buffer().to_string_lossy();
        let outcome = validate::run(self.validator.as_ref(), value.as_str());
        if let Some(message) = outcome.message() {
            debug!("masked value rejected: {message}");
            editor.show_error_once(message)?;
        }
        Ok(LoopState::after_validation(outcome.is_valid(), submitted))
    }
}
