//! Edit buffer and render state for one raw-mode prompt invocation.
//!
//! [`LineEditor`] is the only place that touches the error line, so the
//! "one visible error at a time" rule holds for every prompt variant: a previous
//! error is always cleared before a different one is drawn.

use crate::error::Result;
use crate::input::EditBuffer;
use crate::render::{Phase, Renderer};
use crate::validate::ValidationOutcome;
use std::io::Write;

/// What is currently on screen for a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRenderState {
    pub message: String,
    pub phase: Phase,
    /// Message on the error line, if one is visible
    pub error: Option<String>,
}

impl PromptRenderState {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            phase: Phase::Pending,
            error: None,
        }
    }

    pub fn error_visible(&self) -> bool {
        self.error.is_some()
    }
}

pub struct LineEditor<W: Write> {
    renderer: Renderer<W>,
    buffer: EditBuffer,
    state: PromptRenderState,
}

impl<W: Write> LineEditor<W> {
    pub fn new(renderer: Renderer<W>, buffer: EditBuffer, message: impl Into<String>) -> Self {
        Self {
            renderer,
            buffer,
            state: PromptRenderState::new(message),
        }
    }

    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    pub fn state(&self) -> &PromptRenderState {
        &self.state
    }

    /// Reserve the error line and draw the pending header.
    pub fn begin(&mut self) -> Result<()> {
        self.renderer.reserve_error_line()?;
        self.renderer
            .render_prompt_header(&self.state.message, Phase::Pending)?;
        self.flush()
    }

    /// Append `byte` and echo `glyph`; a full buffer ignores the keystroke entirely.
    pub fn append(&mut self, byte: u8, glyph: char) -> Result<bool> {
        if !self.buffer.push(byte) {
            return Ok(false);
        }
        self.renderer.echo(glyph)?;
        Ok(true)
    }

    /// Drop the last byte and blank its cell; a no-op on an empty buffer.
    pub fn backspace(&mut self) -> Result<bool> {
        if self.buffer.pop().is_none() {
            return Ok(false);
        }
        self.renderer.erase_cell()?;
        Ok(true)
    }

    /// Replace the buffer and redraw the whole input line in place.
    pub fn replace_line(&mut self, content: &[u8]) -> Result<()> {
        self.buffer.replace(content);
        self.renderer.clear_line()?;
        self.renderer
            .render_prompt_header(&self.state.message, Phase::Pending)?;
        self.renderer.echo_str(&self.buffer.to_string_lossy())?;
        Ok(())
    }

    /// Clear any visible error, then show the outcome's message if it has one.
    pub fn apply_validation(&mut self, outcome: &ValidationOutcome) -> Result<()> {
        if self.state.error.take().is_some() {
            self.renderer.clear_error()?;
        }
        if let Some(message) = outcome.message() {
            self.renderer.show_error(message)?;
            self.state.error = Some(message.to_string());
        }
        Ok(())
    }

    /// Show `message` unless exactly that message is already on screen.
    pub fn show_error_once(&mut self, message: &str) -> Result<()> {
        if self.state.error.as_deref() == Some(message) {
            return Ok(());
        }
        self.apply_validation(&ValidationOutcome::invalid(message))
    }

    pub fn flush(&mut self) -> Result<()> {
        self.renderer.flush()?;
        Ok(())
    }

    /// Replace the prompt and error lines with the completed header and
    /// `display_value`, handing back the writer.
    pub fn finish(mut self, display_value: &str) -> Result<W> {
        self.renderer.erase_prompt()?;
        self.state.error = None;
        self.state.phase = Phase::Complete;
        self.renderer
            .render_prompt_header(&self.state.message, Phase::Complete)?;
        self.renderer.render_final_value(display_value)?;
        self.renderer.flush()?;
        Ok(self.renderer.into_inner())
    }
}
