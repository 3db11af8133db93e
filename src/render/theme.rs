//! Color, style and glyph tables used by the renderer.

use super::cursor::Sgr;
use crossterm::Command;
use std::fmt;

/// Colors available to prompt themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    White,
    Grey,
}

impl Color {
    /// SGR parameters for this color.
    pub fn sgr(self) -> &'static str {
        match self {
            Color::Red => "31",
            Color::Green => "32",
            Color::Yellow => "33",
            Color::Blue => "34",
            Color::White => "37",
            Color::Grey => "30;1",
        }
    }

    /// Parse a lowercase color name as used in theme files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "red" => Some(Color::Red),
            "green" => Some(Color::Green),
            "yellow" => Some(Color::Yellow),
            "blue" => Some(Color::Blue),
            "white" => Some(Color::White),
            "grey" | "gray" => Some(Color::Grey),
            _ => None,
        }
    }
}

/// Foreground color plus attributes, emitted as one SGR sequence per component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub color: Option<Color>,
    pub bold: bool,
    pub underline: bool,
}

impl Style {
    pub const fn plain() -> Self {
        Self {
            color: None,
            bold: false,
            underline: false,
        }
    }

    pub const fn fg(color: Color) -> Self {
        Self {
            color: Some(color),
            bold: false,
            underline: false,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn underline(mut self) -> Self {
        self.underline = true;
        self
    }
}

impl Command for Style {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        if let Some(color) = self.color {
            Sgr(color.sgr()).write_ansi(f)?;
        }
        if self.bold {
            Sgr("1").write_ansi(f)?;
        }
        if self.underline {
            Sgr("4").write_ansi(f)?;
        }
        Ok(())
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> std::io::Result<()> {
        Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "prompt rendering requires ANSI escape support",
        ))
    }
}

/// Style for each role in a rendered prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Pending `?` marker
    pub marker: Style,
    /// Completion tick
    pub success: Style,
    /// Error cross and message
    pub error: Style,
    /// Prompt message text
    pub message: Style,
    /// Pointer, ellipsis and default-value hints
    pub hint: Style,
    /// Accepted value echoed on completion
    pub value: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            marker: Style::fg(Color::Blue),
            success: Style::fg(Color::Green),
            error: Style::fg(Color::Red),
            message: Style::plain().bold(),
            hint: Style::fg(Color::Grey),
            value: Style::plain(),
        }
    }
}

impl Theme {
    /// Theme without any color, only bold/underline attributes.
    pub fn monochrome() -> Self {
        Self {
            marker: Style::plain().bold(),
            success: Style::plain().bold(),
            error: Style::plain().underline(),
            message: Style::plain().bold(),
            hint: Style::plain(),
            value: Style::plain(),
        }
    }
}

/// Marker and pointer glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    pub question: &'static str,
    pub tick: &'static str,
    pub cross: &'static str,
    pub ellipsis: &'static str,
    pub pointer_small: &'static str,
    pub pointer: &'static str,
}

pub const UNICODE_GLYPHS: Glyphs = Glyphs {
    question: "?",
    tick: "✔",
    cross: "✖",
    ellipsis: "…",
    pointer_small: "›",
    pointer: "❯",
};

pub const ASCII_GLYPHS: Glyphs = Glyphs {
    question: "?",
    tick: "√",
    cross: "×",
    ellipsis: "...",
    pointer_small: "»",
    pointer: ">",
};

/// Glyph set for the host platform, fixed at build time.
pub const GLYPHS: Glyphs = if cfg!(windows) {
    ASCII_GLYPHS
} else {
    UNICODE_GLYPHS
};

#[cfg(test)]
mod tests {
    use super::*;

    fn ansi(command: impl Command) -> String {
        let mut out = String::new();
        command.write_ansi(&mut out).unwrap();
        out
    }

    #[test]
    fn palette_matches_sgr_codes() {
        assert_eq!(ansi(Style::fg(Color::Red)), "\x1b[31m");
        assert_eq!(ansi(Style::fg(Color::Green)), "\x1b[32m");
        assert_eq!(ansi(Style::fg(Color::Yellow)), "\x1b[33m");
        assert_eq!(ansi(Style::fg(Color::Blue)), "\x1b[34m");
        assert_eq!(ansi(Style::fg(Color::White)), "\x1b[37m");
        assert_eq!(ansi(Style::fg(Color::Grey)), "\x1b[30;1m");
    }

    #[test]
    fn attributes_follow_color() {
        assert_eq!(ansi(Style::plain().bold()), "\x1b[1m");
        assert_eq!(ansi(Style::plain().underline()), "\x1b[4m");
        assert_eq!(
            ansi(Style::fg(Color::Blue).bold().underline()),
            "\x1b[34m\x1b[1m\x1b[4m"
        );
        assert_eq!(ansi(Style::plain()), "");
    }

    #[test]
    fn color_names() {
        assert_eq!(Color::from_name("Grey"), Some(Color::Grey));
        assert_eq!(Color::from_name("gray"), Some(Color::Grey));
        assert_eq!(Color::from_name(" red "), Some(Color::Red));
        assert_eq!(Color::from_name("magenta"), None);
    }

    #[test]
    fn monochrome_has_no_colors() {
        let theme = Theme::monochrome();
        for style in [
            theme.marker,
            theme.success,
            theme.error,
            theme.message,
            theme.hint,
            theme.value,
        ] {
            assert_eq!(style.color, None);
        }
    }

    #[test]
    fn fallback_glyphs_avoid_wide_symbols() {
        assert_eq!(ASCII_GLYPHS.ellipsis, "...");
        assert_eq!(ASCII_GLYPHS.pointer, ">");
        assert_eq!(ASCII_GLYPHS.question, UNICODE_GLYPHS.question);
    }
}
