//! # keyprompt - Interactive prompts for character terminals
//!
//! Reads raw keystrokes, renders prompts and validation feedback in place (overwriting
//! earlier output instead of scrolling), and returns a validated value.
//!
//! ## Features
//!
//! - **Masked input**: password prompts that echo a mask glyph per keystroke
//! - **Numeric stepper**: digit-only input with arrow-key increment/decrement and
//!   validation on every keystroke
//! - **In-place feedback**: a single error line beneath the input, cleared as soon as
//!   it no longer applies
//! - **Terminal safety**: raw mode is undone on return, on panic, on `exit` and on
//!   terminating signals
//!
//! ## Architecture
//!
//! - [`terminal`] - raw-mode controller and teardown hooks
//! - [`render`] - cursor primitives, theme and prompt rendering
//! - [`input`] - key decoding and the edit buffer
//! - [`prompt`] - input loop state machines and line-buffered prompts
//! - [`validate`] - validator contract
//! - [`error`] - error types

pub mod error;
pub mod input;
pub mod prompt;
pub mod render;
pub mod terminal;
pub mod validate;

#[cfg(feature = "config")]
pub mod config;

pub use error::{PromptError, Result};
pub use prompt::{
    prompt_confirm, prompt_masked, prompt_number, prompt_text, ConfirmPrompt, MaskedPrompt,
    NumberPrompt, TextPrompt,
};
pub use render::Theme;
pub use terminal::{Detached, ModeControl, SystemTerminal};
pub use validate::{ValidationOutcome, Validator};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
