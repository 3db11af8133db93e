//! The process's controlling terminal.
//!
//! On Unix the line discipline is switched through `termios` directly so that only
//! echo and canonical input are turned off: output post-processing and signal keys
//! keep working, which lets Ctrl-C reach the teardown handlers. Other platforms fall
//! back to crossterm's raw mode.

use super::mode::TerminalDevice;
use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use std::io;

/// Attribute snapshot of the controlling terminal.
#[cfg(unix)]
pub type Attributes = libc::termios;

#[cfg(not(unix))]
pub type Attributes = ConsoleMode;

/// Console state as seen through crossterm.
#[cfg(not(unix))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleMode {
    Cooked,
    Raw,
}

/// Terminal attached to standard input.
#[derive(Debug, Clone, Copy)]
pub struct Tty {
    #[cfg(unix)]
    fd: std::os::unix::io::RawFd,
}

impl Tty {
    pub fn stdin() -> Self {
        Self {
            #[cfg(unix)]
            fd: libc::STDIN_FILENO,
        }
    }
}

/// Cursor sequences go to stderr: it is unbuffered and stays on the terminal when
/// stdout is captured by a script.
fn set_cursor_visible(visible: bool) -> io::Result<()> {
    let mut stderr = io::stderr();
    if visible {
        execute!(stderr, Show)
    } else {
        execute!(stderr, Hide)
    }
}

#[cfg(unix)]
impl TerminalDevice for Tty {
    type Attributes = libc::termios;

    fn capture(&self) -> io::Result<libc::termios> {
        let mut attributes = std::mem::MaybeUninit::<libc::termios>::uninit();
        // SAFETY: tcgetattr fully initialises the struct when it returns 0.
        let rc = unsafe { libc::tcgetattr(self.fd, attributes.as_mut_ptr()) };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(unsafe { attributes.assume_init() })
    }

    fn apply(&self, attributes: &libc::termios) -> io::Result<()> {
        // SAFETY: `attributes` points to a valid termios for the duration of the call.
        let rc = unsafe { libc::tcsetattr(self.fd, libc::TCSANOW, attributes) };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn raw_from(&self, original: &libc::termios) -> libc::termios {
        let mut raw = *original;
        raw.c_lflag &= !(libc::ECHO | libc::ICANON);
        raw.c_cc[libc::VMIN] = 1;
        raw.c_cc[libc::VTIME] = 0;
        raw
    }

    fn set_cursor_visible(&self, visible: bool) -> io::Result<()> {
        set_cursor_visible(visible)
    }
}

#[cfg(not(unix))]
impl TerminalDevice for Tty {
    type Attributes = ConsoleMode;

    fn capture(&self) -> io::Result<ConsoleMode> {
        Ok(if crossterm::terminal::is_raw_mode_enabled()? {
            ConsoleMode::Raw
        } else {
            ConsoleMode::Cooked
        })
    }

    fn apply(&self, attributes: &ConsoleMode) -> io::Result<()> {
        match attributes {
            ConsoleMode::Raw => crossterm::terminal::enable_raw_mode(),
            ConsoleMode::Cooked => crossterm::terminal::disable_raw_mode(),
        }
    }

    fn raw_from(&self, _original: &ConsoleMode) -> ConsoleMode {
        ConsoleMode::Raw
    }

    fn set_cursor_visible(&self, visible: bool) -> io::Result<()> {
        set_cursor_visible(visible)
    }
}

/// Restore `attributes` and show the cursor from a teardown hook.
///
/// Only async-signal-safe calls on Unix: this runs inside signal handlers.
#[cfg(unix)]
pub(crate) fn restore_from_hook(attributes: &libc::termios) {
    const SHOW_CURSOR: &[u8] = b"\x1b[?25h";
    // SAFETY: tcsetattr and write are async-signal-safe; both pointers are valid.
    unsafe {
        libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, attributes);
        libc::write(
            libc::STDERR_FILENO,
            SHOW_CURSOR.as_ptr().cast(),
            SHOW_CURSOR.len(),
        );
    }
}

#[cfg(not(unix))]
pub(crate) fn restore_from_hook(attributes: &ConsoleMode) {
    let _ = Tty::stdin().apply(attributes);
    let _ = set_cursor_visible(true);
}
