//! Prompt renderer.
//!
//! Every method queues escape sequences on the wrapped writer; nothing reaches the
//! terminal until [`Renderer::flush`]. The error line always lives on the row directly
//! beneath the input line and is drawn between a save/restore cursor pair, so the
//! input line never scrolls and keeps its column while the user is still typing.

use super::cursor::{
    ClearLine, ClearLines, MoveDown, MoveLeft, MoveUp, RestorePosition, SavePosition, RESET,
};
use super::theme::{Glyphs, Theme, GLYPHS};
use crossterm::queue;
use crossterm::style::Print;
use std::io::{self, Write};

/// Whether a header is still collecting input or shows an accepted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Pending,
    Complete,
}

/// Writes prompt output through the cursor primitives and theme.
pub struct Renderer<W: Write> {
    out: W,
    theme: Theme,
    glyphs: Glyphs,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, theme: Theme) -> Self {
        Self {
            out,
            theme,
            glyphs: GLYPHS,
        }
    }

    pub fn with_glyphs(mut self, glyphs: Glyphs) -> Self {
        self.glyphs = glyphs;
        self
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn move_up(&mut self, lines: u16) -> io::Result<()> {
        queue!(self.out, MoveUp(lines))
    }

    pub fn move_down(&mut self, lines: u16) -> io::Result<()> {
        queue!(self.out, MoveDown(lines))
    }

    pub fn move_left(&mut self, columns: u16) -> io::Result<()> {
        queue!(self.out, MoveLeft(columns))
    }

    pub fn save_position(&mut self) -> io::Result<()> {
        queue!(self.out, SavePosition)
    }

    pub fn restore_position(&mut self) -> io::Result<()> {
        queue!(self.out, RestorePosition)
    }

    pub fn clear_line(&mut self) -> io::Result<()> {
        queue!(self.out, ClearLine)
    }

    /// Erase the current line and `lines` lines above it.
    pub fn clear_lines(&mut self, lines: u16) -> io::Result<()> {
        queue!(self.out, ClearLines(lines))
    }

    /// Make sure a row exists below the cursor so the error line can be reached
    /// with a plain cursor-down, scrolling once now if the prompt starts on the
    /// last row. Leaves the cursor at column 0 of the original row.
    pub fn reserve_error_line(&mut self) -> io::Result<()> {
        queue!(self.out, Print("\n"), MoveUp(1), Print("\r"))
    }

    pub fn render_prompt_header(&mut self, message: &str, phase: Phase) -> io::Result<()> {
        self.render_prompt_header_with_hint(message, None, phase)
    }

    /// Draw marker, message, an optional hint such as a default value, and the
    /// trailing indicator. The cursor ends where input (or the final value) goes.
    pub fn render_prompt_header_with_hint(
        &mut self,
        message: &str,
        hint: Option<&str>,
        phase: Phase,
    ) -> io::Result<()> {
        let (marker_style, marker, indicator) = match phase {
            Phase::Pending => (
                self.theme.marker,
                self.glyphs.question,
                self.glyphs.pointer_small,
            ),
            Phase::Complete => (self.theme.success, self.glyphs.tick, self.glyphs.ellipsis),
        };

        queue!(
            self.out,
            marker_style,
            Print(marker),
            RESET,
            Print(" "),
            self.theme.message,
            Print(message),
            RESET,
            Print(" ")
        )?;
        if let Some(hint) = hint {
            queue!(self.out, self.theme.hint, Print(hint), RESET, Print(" "))?;
        }
        queue!(self.out, self.theme.hint, Print(indicator), RESET, Print(" "))
    }

    /// Print the accepted value, reset styling and end the line.
    pub fn render_final_value(&mut self, display_value: &str) -> io::Result<()> {
        queue!(
            self.out,
            self.theme.value,
            Print(display_value),
            RESET,
            Print("\n")
        )
    }

    pub fn echo(&mut self, glyph: char) -> io::Result<()> {
        queue!(self.out, Print(glyph))
    }

    pub fn echo_str(&mut self, text: &str) -> io::Result<()> {
        queue!(self.out, Print(text))
    }

    /// Visually erase the cell left of the cursor, leaving the cursor on it.
    pub fn erase_cell(&mut self) -> io::Result<()> {
        queue!(self.out, MoveLeft(1), Print(" "), MoveLeft(1))
    }

    /// Draw the error cross and `message` at the cursor.
    pub fn render_error(&mut self, message: &str) -> io::Result<()> {
        queue!(
            self.out,
            self.theme.error,
            Print(self.glyphs.cross),
            Print(" "),
            Print(message),
            RESET
        )
    }

    /// Draw `message` on the error line beneath the input line.
    pub fn show_error(&mut self, message: &str) -> io::Result<()> {
        queue!(self.out, SavePosition, MoveDown(1), ClearLine)?;
        self.render_error(message)?;
        queue!(self.out, RestorePosition)
    }

    /// Blank the error line beneath the input line.
    pub fn clear_error(&mut self) -> io::Result<()> {
        queue!(
            self.out,
            SavePosition,
            MoveDown(1),
            ClearLine,
            RestorePosition
        )
    }

    /// Erase the error line and the input line, ending at column 0 of the input line.
    pub fn erase_prompt(&mut self) -> io::Result<()> {
        self.move_down(1)?;
        self.clear_lines(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::theme::{Color, Style, UNICODE_GLYPHS};

    fn renderer() -> Renderer<Vec<u8>> {
        Renderer::new(Vec::new(), Theme::default()).with_glyphs(UNICODE_GLYPHS)
    }

    fn output(renderer: Renderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn pending_header_layout() {
        let mut r = renderer();
        r.render_prompt_header("Age", Phase::Pending).unwrap();
        assert_eq!(
            output(r),
            "\x1b[34m?\x1b[0m \x1b[1mAge\x1b[0m \x1b[30;1m›\x1b[0m "
        );
    }

    #[test]
    fn complete_header_and_value() {
        let mut r = renderer();
        r.render_prompt_header("Age", Phase::Complete).unwrap();
        r.render_final_value("121").unwrap();
        assert_eq!(
            output(r),
            "\x1b[32m✔\x1b[0m \x1b[1mAge\x1b[0m \x1b[30;1m…\x1b[0m 121\x1b[0m\n"
        );
    }

    #[test]
    fn header_hint_precedes_indicator() {
        let mut r = Renderer::new(Vec::new(), Theme::monochrome()).with_glyphs(UNICODE_GLYPHS);
        r.render_prompt_header_with_hint("Name", Some("(bob)"), Phase::Pending)
            .unwrap();
        assert_eq!(
            output(r),
            "\x1b[1m?\x1b[0m \x1b[1mName\x1b[0m (bob)\x1b[0m ›\x1b[0m "
        );
    }

    #[test]
    fn error_line_is_bracketed_by_save_restore() {
        let mut r = renderer();
        r.show_error("must be >=18").unwrap();
        assert_eq!(
            output(r),
            "\x1b[s\x1b[1B\x1b[2K\r\x1b[31m✖ must be >=18\x1b[0m\x1b[u"
        );
    }

    #[test]
    fn clear_error_blanks_line_below() {
        let mut r = renderer();
        r.clear_error().unwrap();
        assert_eq!(output(r), "\x1b[s\x1b[1B\x1b[2K\r\x1b[u");
    }

    #[test]
    fn erase_cell_moves_back_over_blank() {
        let mut r = renderer();
        r.erase_cell().unwrap();
        assert_eq!(output(r), "\x1b[D \x1b[D");
    }

    #[test]
    fn erase_prompt_clears_both_lines() {
        let mut r = renderer();
        r.erase_prompt().unwrap();
        assert_eq!(output(r), "\x1b[1B\x1b[2K\x1b[A\x1b[2K\r");
    }

    #[test]
    fn reserve_error_line_returns_to_column_zero() {
        let mut r = renderer();
        r.reserve_error_line().unwrap();
        assert_eq!(output(r), "\n\x1b[A\r");
    }

    #[test]
    fn value_style_wraps_final_value() {
        let theme = Theme {
            value: Style::fg(Color::White),
            ..Theme::default()
        };
        let mut r = Renderer::new(Vec::new(), theme);
        r.render_final_value("ok").unwrap();
        assert_eq!(output(r), "\x1b[37mok\x1b[0m\n");
    }
}
