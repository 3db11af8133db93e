//! Line-buffered prompts: the terminal stays in canonical mode with echo on and a
//! whole line is read per submission.
//!
//! After Enter the cursor sits on the row below the header. A rejected line is
//! reported on that row and the header is redrawn in place above it, so repeated
//! attempts never scroll the screen.

use crate::error::{PromptError, Result};
use crate::render::{Phase, Renderer, Theme};
use crate::validate::{self, BoxedValidator, ValidationOutcome, Validator};
use log::debug;
use std::io::{self, BufRead, Write};

/// Line-buffered free-text prompt.
pub struct TextPrompt<'a> {
    message: String,
    default: Option<String>,
    validator: Option<BoxedValidator<'a, str>>,
    theme: Theme,
}

impl<'a> TextPrompt<'a> {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            default: None,
            validator: None,
            theme: Theme::default(),
        }
    }

    /// Value used when an empty line is submitted; shown as a hint.
    pub fn default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
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

    pub fn interact(self) -> Result<String> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.interact_on(stdin.lock(), stdout.lock())
    }

    pub fn interact_on<R: BufRead, W: Write>(self, input: R, output: W) -> Result<String> {
        let hint = self.default.as_ref().map(|value| format!("({value})"));
        let mut session = LineSession::new(Renderer::new(output, self.theme), &self.message);

        session.run(input, hint.as_deref(), |line| {
            let value = match (line.is_empty(), &self.default) {
                (true, Some(default)) => default.clone(),
                _ => line.to_string(),
            };
            let outcome = validate::run(self.validator.as_ref(), value.as_str());
            match outcome.message() {
                Some(message) => Err(message.to_string()),
                None => Ok((value.clone(), value)),
            }
        })
    }
}

/// Line-buffered yes/no prompt.
pub struct ConfirmPrompt {
    message: String,
    default: bool,
    theme: Theme,
}

/// Error shown for answers that are neither yes nor no.
pub const CONFIRM_MESSAGE: &str = "Please answer yes or no";

impl ConfirmPrompt {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            default: false,
            theme: Theme::default(),
        }
    }

    pub fn default(mut self, value: bool) -> Self {
        self.default = value;
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn interact(self) -> Result<bool> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.interact_on(stdin.lock(), stdout.lock())
    }

    pub fn interact_on<R: BufRead, W: Write>(self, input: R, output: W) -> Result<bool> {
        let hint = if self.default { "(Y/n)" } else { "(y/N)" };
        let mut session = LineSession::new(Renderer::new(output, self.theme), &self.message);

        session.run(input, Some(hint), |line| {
            let answer = match parse_answer(line) {
                Some(answer) => answer,
                None if line.trim().is_empty() => self.default,
                None => return Err(CONFIRM_MESSAGE.to_string()),
            };
            let shown = if answer { "yes" } else { "no" };
            Ok((answer, shown.to_string()))
        })
    }
}

fn parse_answer(line: &str) -> Option<bool> {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Header/error-line bookkeeping shared by the line-buffered prompts.
struct LineSession<'m, W: Write> {
    renderer: Renderer<W>,
    message: &'m str,
}

impl<'m, W: Write> LineSession<'m, W> {
    fn new(renderer: Renderer<W>, message: &'m str) -> Self {
        Self { renderer, message }
    }

    /// Read lines until `accept` returns a value and its display form.
    fn run<R, T, F>(&mut self, mut input: R, hint: Option<&str>, mut accept: F) -> Result<T>
    where
        R: BufRead,
        F: FnMut(&str) -> std::result::Result<(T, String), String>,
    {
        self.renderer
            .render_prompt_header_with_hint(self.message, hint, Phase::Pending)?;
        self.renderer.flush()?;

        loop {
            let mut line = String::new();
            let read = input
                .read_line(&mut line)
                .map_err(|err| PromptError::io("failed to read line", err))?;
            if read == 0 {
                return Err(PromptError::InputClosed);
            }

            match accept(line.trim_end_matches(['\r', '\n'])) {
                Ok((value, shown)) => {
                    // Error row and header row, then the final rendering.
                    self.renderer.clear_lines(1)?;
                    self.renderer
                        .render_prompt_header(self.message, Phase::Complete)?;
                    self.renderer.render_final_value(&shown)?;
                    self.renderer.flush()?;
                    return Ok(value);
                }
                Err(message) => {
                    debug!("line rejected: {message}");
                    self.renderer.clear_line()?;
                    self.renderer.render_error(&message)?;
                    self.renderer.move_up(1)?;
                    self.renderer.clear_line()?;
                    self.renderer
                        .render_prompt_header_with_hint(self.message, hint, Phase::Pending)?;
                    self.renderer.flush()?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(prompt: TextPrompt<'_>, input: &str) -> Result<(String, String)> {
        let mut output = Vec::new();
        let value = prompt.interact_on(input.as_bytes(), &mut output)?;
        Ok((value, String::from_utf8(output).unwrap()))
    }

    fn confirm(prompt: ConfirmPrompt, input: &str) -> (bool, String) {
        let mut output = Vec::new();
        let value = prompt.interact_on(input.as_bytes(), &mut output).unwrap();
        (value, String::from_utf8(output).unwrap())
    }

    #[test]
    fn empty_line_uses_default() {
        let (value, out) = text(TextPrompt::new("Name").default("bob"), "\n").unwrap();
        assert_eq!(value, "bob");
        assert!(out.contains("(bob)"));
        assert!(out.ends_with("bob\x1b[0m\n"));
    }

    #[test]
    fn typed_line_wins_over_default() {
        let (value, _) = text(TextPrompt::new("Name").default("bob"), "alice\r\n").unwrap();
        assert_eq!(value, "alice");
    }

    #[test]
    fn rejected_line_redraws_header_in_place() {
        let (value, out) = text(
            TextPrompt::new("Name").validator(|name: &str| {
                if name.len() < 3 {
                    "too short"
                } else {
                    ""
                }
            }),
            "al\nalice\n",
        )
        .unwrap();

        assert_eq!(value, "alice");
        let error = out.find("too short").unwrap();
        let redraw = out[error..].find("\x1b[A\x1b[2K\r").unwrap();
        assert!(redraw > 0);
        // Error row and header row are both erased before the completed header.
        assert!(out.contains("\x1b[2K\x1b[A\x1b[2K\r"));
    }

    #[test]
    fn closed_input_is_an_error() {
        let err = text(TextPrompt::new("Name"), "").unwrap_err();
        assert!(matches!(err, PromptError::InputClosed));
    }

    #[test]
    fn confirm_parses_answers() {
        assert!(confirm(ConfirmPrompt::new("ok?"), "y\n").0);
        assert!(confirm(ConfirmPrompt::new("ok?"), "YES\n").0);
        assert!(!confirm(ConfirmPrompt::new("ok?").default(true), "no\n").0);
    }

    #[test]
    fn confirm_empty_uses_default() {
        let (answer, out) = confirm(ConfirmPrompt::new("ok?").default(true), "\n");
        assert!(answer);
        assert!(out.contains("(Y/n)"));
        assert!(out.ends_with("yes\x1b[0m\n"));
    }

    #[test]
    fn confirm_reasks_on_garbage() {
        let (answer, out) = confirm(ConfirmPrompt::new("ok?"), "maybe\nn\n");
        assert!(!answer);
        assert_eq!(out.matches(CONFIRM_MESSAGE).count(), 1);
    }
}
