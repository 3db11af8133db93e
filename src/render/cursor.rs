//! Cursor and line primitives as crossterm [`Command`]s.
//!
//! crossterm's own cursor commands always emit the numeric CSI form and use the DEC
//! save/restore pair; these emit the short VT100 forms (`ESC[A`, `ESC[s`, ...) that
//! prompt output is written in, and compose with `queue!` like any other command.

use crossterm::Command;
use std::fmt;

macro_rules! ansi_only {
    () => {
        #[cfg(windows)]
        fn execute_winapi(&self) -> std::io::Result<()> {
            Err(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "prompt rendering requires ANSI escape support",
            ))
        }
    };
}

fn write_csi(f: &mut impl fmt::Write, count: u16, short: &str, suffix: char) -> fmt::Result {
    match count {
        0 => Ok(()),
        1 => f.write_str(short),
        n => write!(f, "\x1b[{n}{suffix}"),
    }
}

/// Move the cursor up `n` lines (`ESC[A` for one line).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveUp(pub u16);

impl Command for MoveUp {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write_csi(f, self.0, "\x1b[A", 'A')
    }
    ansi_only!();
}

/// Move the cursor down `n` lines; always the explicit `ESC[nB` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveDown(pub u16);

impl Command for MoveDown {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        if self.0 == 0 {
            return Ok(());
        }
        write!(f, "\x1b[{}B", self.0)
    }
    ansi_only!();
}

/// Move the cursor left `n` columns (`ESC[D` for one column).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveLeft(pub u16);

impl Command for MoveLeft {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write_csi(f, self.0, "\x1b[D", 'D')
    }
    ansi_only!();
}

/// Move the cursor right `n` columns (`ESC[C` for one column).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRight(pub u16);

impl Command for MoveRight {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write_csi(f, self.0, "\x1b[C", 'C')
    }
    ansi_only!();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavePosition;

impl Command for SavePosition {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str("\x1b[s")
    }
    ansi_only!();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestorePosition;

impl Command for RestorePosition {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str("\x1b[u")
    }
    ansi_only!();
}

/// Erase the current line and return to column 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearLine;

impl Command for ClearLine {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str("\x1b[2K\r")
    }
    ansi_only!();
}

/// Erase the current line and the `n` lines above it, ending at column 0 of the
/// topmost erased line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearLines(pub u16);

impl Command for ClearLines {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        for _ in 0..self.0 {
            f.write_str("\x1b[2K")?;
            MoveUp(1).write_ansi(f)?;
        }
        ClearLine.write_ansi(f)
    }
    ansi_only!();
}

/// Raw SGR parameter list, e.g. `Sgr("30;1")` for grey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sgr(pub &'static str);

impl Command for Sgr {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write!(f, "\x1b[{}m", self.0)
    }
    ansi_only!();
}

/// `ESC[0m`.
pub const RESET: Sgr = Sgr("0");
