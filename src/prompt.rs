//! Prompt variants and the free-function call contract.
//!
//! Raw-mode prompts ([`MaskedPrompt`], [`NumberPrompt`]) run the keystroke state
//! machine in [`state`] on top of a [`editor::LineEditor`]; the line-buffered ones
//! ([`TextPrompt`], [`ConfirmPrompt`]) read whole lines with echo left on. Every
//! prompt blocks until a value is accepted and leaves the terminal as it found it.

pub mod editor;
pub mod masked;
pub mod number;
pub mod state;
pub mod text;

pub use editor::{LineEditor, PromptRenderState};
pub use masked::{MaskedPrompt, REQUIRED_MESSAGE};
pub use number::{NumberPrompt, DEFAULT_MAX_DIGITS};
pub use state::LoopState;
pub use text::{ConfirmPrompt, TextPrompt};

use crate::error::Result;
use crate::validate::ValidationOutcome;

/// Ask for a line of text; an empty line yields `default`.
pub fn prompt_text<F, S>(message: &str, default: &str, validator: F) -> Result<String>
where
    F: Fn(&str) -> S,
    S: Into<ValidationOutcome>,
{
    TextPrompt::new(message)
        .default(default)
        .validator(validator)
        .interact()
}

/// Ask for a secret, echoing `mask` for every typed byte.
pub fn prompt_masked(message: &str, mask: char, required: bool) -> Result<String> {
    MaskedPrompt::new(message)
        .mask(mask)
        .required(required)
        .interact()
}

/// Ask for a non-negative integer, validated on every keystroke.
pub fn prompt_number<F, S>(message: &str, default: u64, validator: F) -> Result<u64>
where
    F: Fn(&u64) -> S,
    S: Into<ValidationOutcome>,
{
    NumberPrompt::new(message)
        .default(default)
        .validator(validator)
        .interact()
}

/// Ask a yes/no question.
pub fn prompt_confirm(message: &str, default: bool) -> Result<bool> {
    ConfirmPrompt::new(message).default(default).interact()
}
