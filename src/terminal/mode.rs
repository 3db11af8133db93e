//! Raw-mode bookkeeping independent of the concrete terminal device.
//!
//! [`RawModeState`] captures the device's attributes once, lazily, on the first
//! activation and restores exactly that snapshot on every deactivation. The device
//! itself is a trait so the same state machine drives a real tty and test doubles.

use crate::error::{PromptError, Result};
use log::debug;
use std::io;

/// Terminal device whose line discipline and cursor visibility can be switched.
pub trait TerminalDevice {
    /// Opaque attribute snapshot (a `termios` on Unix).
    type Attributes: Clone;

    /// Read the device's current attributes.
    fn capture(&self) -> io::Result<Self::Attributes>;

    /// Apply a full attribute snapshot.
    fn apply(&self, attributes: &Self::Attributes) -> io::Result<()>;

    /// Derive the no-echo, non-canonical variant of `original`.
    fn raw_from(&self, original: &Self::Attributes) -> Self::Attributes;

    /// Show or hide the cursor.
    fn set_cursor_visible(&self, visible: bool) -> io::Result<()>;
}

/// Entry/exit of raw mode, as seen by a running prompt.
pub trait ModeControl {
    fn enter_raw_mode(&mut self) -> Result<()>;
    fn exit_raw_mode(&mut self) -> Result<()>;
}

/// Whether raw mode is currently applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawMode {
    Off,
    On,
}

/// Raw-mode state for one terminal device.
pub struct RawModeState<D: TerminalDevice> {
    device: D,
    original: Option<D::Attributes>,
    mode: RawMode,
}

impl<D: TerminalDevice> RawModeState<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            original: None,
            mode: RawMode::Off,
        }
    }

    pub fn mode(&self) -> RawMode {
        self.mode
    }

    /// Attributes captured on the first activation, if any.
    pub fn original(&self) -> Option<&D::Attributes> {
        self.original.as_ref()
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// The attributes to restore on exit, captured from the device on first use.
    pub fn capture_original(&mut self) -> Result<D::Attributes> {
        if let Some(original) = &self.original {
            return Ok(original.clone());
        }
        let captured = self
            .device
            .capture()
            .map_err(|err| PromptError::terminal("failed to capture terminal attributes", err))?;
        debug!("captured original terminal attributes");
        self.original = Some(captured.clone());
        Ok(captured)
    }

    /// Disable echo and canonical input and hide the cursor.
    ///
    /// The original attributes are captured only on the first call; later calls
    /// reapply the raw attributes derived from that same snapshot. If anything fails
    /// after raw mode was applied, the original attributes are put back before the
    /// error is returned.
    pub fn enter(&mut self) -> Result<()> {
        let original = self.capture_original()?;

        let raw = self.device.raw_from(&original);
        self.device
            .apply(&raw)
            .map_err(|err| PromptError::terminal("failed to enable raw mode", err))?;
        self.mode = RawMode::On;

        if let Err(err) = self.device.set_cursor_visible(false) {
            debug!("hiding the cursor failed, leaving raw mode: {err}");
            self.device.apply(&original).map_err(|restore_err| {
                PromptError::terminal("failed to restore terminal attributes", restore_err)
            })?;
            self.mode = RawMode::Off;
            return Err(PromptError::io("failed to hide cursor", err));
        }

        debug!("raw mode enabled");
        Ok(())
    }

    /// Restore the captured attributes and show the cursor.
    ///
    /// A no-op when raw mode was never entered.
    pub fn exit(&mut self) -> Result<()> {
        let Some(original) = &self.original else {
            return Ok(());
        };

        self.device
            .apply(original)
            .map_err(|err| PromptError::terminal("failed to restore terminal attributes", err))?;
        self.mode = RawMode::Off;
        self.device
            .set_cursor_visible(true)
            .map_err(|err| PromptError::io("failed to show cursor", err))?;

        debug!("raw mode disabled");
        Ok(())
    }

    /// Best-effort restoration used on teardown paths; errors are swallowed because
    /// there is nobody left to report them to. Returns whether anything was restored.
    pub fn restore(&mut self) -> bool {
        if self.mode == RawMode::Off {
            return false;
        }
        if let Some(original) = &self.original {
            let _ = self.device.apply(original);
        }
        let _ = self.device.set_cursor_visible(true);
        self.mode = RawMode::Off;
        true
    }
}

impl<D: TerminalDevice> ModeControl for RawModeState<D> {
    fn enter_raw_mode(&mut self) -> Result<()> {
        self.enter()
    }

    fn exit_raw_mode(&mut self) -> Result<()> {
        self.exit()
    }
}

/// Scoped raw-mode acquisition: exits raw mode when dropped unless released first.
pub struct RawModeGuard<'a, M: ModeControl + ?Sized> {
    mode: &'a mut M,
    released: bool,
}

impl<'a, M: ModeControl + ?Sized> RawModeGuard<'a, M> {
    pub fn acquire(mode: &'a mut M) -> Result<Self> {
        mode.enter_raw_mode()?;
        Ok(Self {
            mode,
            released: false,
        })
    }

    /// Exit raw mode, surfacing any failure to the caller.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        self.mode.exit_raw_mode()
    }
}

impl<M: ModeControl + ?Sized> Drop for RawModeGuard<'_, M> {
    fn drop(&mut self) {
        if !self.released {
            let _ = self.mode.exit_raw_mode();
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    pub const ECHO: u32 = 0b01;
    pub const ICANON: u32 = 0b10;

    #[derive(Debug, Default)]
    pub struct FakeTerminal {
        pub attributes: u32,
        pub cursor_visible: bool,
        pub captures: usize,
        pub fail_capture: bool,
        pub fail_apply: bool,
        pub fail_hide_cursor: bool,
    }

    /// Device double whose state stays observable after being moved into a `RawModeState`.
    #[derive(Clone)]
    pub struct FakeDevice(pub Rc<RefCell<FakeTerminal>>);

    impl FakeDevice {
        pub fn cooked() -> Self {
            Self(Rc::new(RefCell::new(FakeTerminal {
                attributes: ECHO | ICANON,
                cursor_visible: true,
                ..FakeTerminal::default()
            })))
        }
    }

    impl TerminalDevice for FakeDevice {
        type Attributes = u32;

        fn capture(&self) -> io::Result<u32> {
            let mut term = self.0.borrow_mut();
            if term.fail_capture {
                return Err(io::Error::new(io::ErrorKind::Other, "tcgetattr failed"));
            }
            term.captures += 1;
            Ok(term.attributes)
        }

        fn apply(&self, attributes: &u32) -> io::Result<()> {
            let mut term = self.0.borrow_mut();
            if term.fail_apply {
                return Err(io::Error::new(io::ErrorKind::Other, "tcsetattr failed"));
            }
            term.attributes = *attributes;
            Ok(())
        }

        fn raw_from(&self, original: &u32) -> u32 {
            original & !(ECHO | ICANON)
        }

        fn set_cursor_visible(&self, visible: bool) -> io::Result<()> {
            let mut term = self.0.borrow_mut();
            if !visible && term.fail_hide_cursor {
                return Err(io::Error::new(io::ErrorKind::Other, "bad file descriptor"));
            }
            term.cursor_visible = visible;
            Ok(())
        }
    }

    #[test]
    fn enter_disables_echo_and_hides_cursor() {
        let device = FakeDevice::cooked();
        let mut state = RawModeState::new(device.clone());

        state.enter().unwrap();

        let term = device.0.borrow();
        assert_eq!(term.attributes & (ECHO | ICANON), 0);
        assert!(!term.cursor_visible);
        assert_eq!(state.mode(), RawMode::On);
    }

    #[test]
    fn exit_restores_captured_attributes() {
        let device = FakeDevice::cooked();
        let mut state = RawModeState::new(device.clone());

        state.enter().unwrap();
        state.exit().unwrap();

        let term = device.0.borrow();
        assert_eq!(term.attributes, ECHO | ICANON);
        assert!(term.cursor_visible);
        assert_eq!(state.mode(), RawMode::Off);
    }

    #[test]
    fn capture_happens_only_once() {
        let device = FakeDevice::cooked();
        let mut state = RawModeState::new(device.clone());

        state.enter().unwrap();
        state.enter().unwrap();
        assert_eq!(device.0.borrow().captures, 1);
        assert_eq!(state.original(), Some(&(ECHO | ICANON)));

        // Re-entering after an exit still restores the first snapshot.
        state.exit().unwrap();
        device.0.borrow_mut().attributes = ECHO;
        state.enter().unwrap();
        state.exit().unwrap();
        assert_eq!(device.0.borrow().attributes, ECHO | ICANON);
    }

    #[test]
    fn exit_without_enter_is_noop() {
        let device = FakeDevice::cooked();
        let mut state = RawModeState::new(device.clone());

        state.exit().unwrap();
        assert_eq!(device.0.borrow().attributes, ECHO | ICANON);
    }

    #[test]
    fn capture_failure_is_fatal() {
        let device = FakeDevice::cooked();
        device.0.borrow_mut().fail_capture = true;
        let mut state = RawModeState::new(device.clone());

        let err = state.enter().unwrap_err();
        assert!(matches!(err, PromptError::TerminalAttributes { .. }));
        assert_eq!(state.mode(), RawMode::Off);
        assert_eq!(device.0.borrow().attributes, ECHO | ICANON);
    }

    #[test]
    fn restore_failure_is_propagated() {
        let device = FakeDevice::cooked();
        let mut state = RawModeState::new(device.clone());
        state.enter().unwrap();

        device.0.borrow_mut().fail_apply = true;
        assert!(matches!(
            state.exit(),
            Err(PromptError::TerminalAttributes { .. })
        ));
    }

    #[test]
    fn teardown_restores_interrupted_session() {
        let device = FakeDevice::cooked();
        let mut state = RawModeState::new(device.clone());
        state.enter().unwrap();

        assert!(state.restore());
        {
            let term = device.0.borrow();
            assert_eq!(term.attributes, ECHO | ICANON);
            assert!(term.cursor_visible);
        }

        // Second firing has nothing to do.
        assert!(!state.restore());
    }

    #[test]
    fn guard_exits_on_drop() {
        let device = FakeDevice::cooked();
        let mut state = RawModeState::new(device.clone());

        {
            let _guard = RawModeGuard::acquire(&mut state).unwrap();
            assert_eq!(device.0.borrow().attributes, 0);
        }

        assert_eq!(device.0.borrow().attributes, ECHO | ICANON);
        assert!(device.0.borrow().cursor_visible);
    }

    #[test]
    fn guard_release_reports_errors() {
        let device = FakeDevice::cooked();
        let mut state = RawModeState::new(device.clone());

        let guard = RawModeGuard::acquire(&mut state).unwrap();
        device.0.borrow_mut().fail_apply = true;
        assert!(guard.release().is_err());
    }

    #[test]
    fn failed_cursor_hide_rolls_back_raw_mode() {
        let device = FakeDevice::cooked();
        device.0.borrow_mut().fail_hide_cursor = true;
        let mut state = RawModeState::new(device.clone());

        let err = state.enter().unwrap_err();
        assert!(matches!(err, PromptError::Io { .. }));
        assert_eq!(state.mode(), RawMode::Off);
        assert_eq!(device.0.borrow().attributes, ECHO | ICANON);
        assert!(RawModeGuard::acquire(&mut state).is_err());
        assert_eq!(device.0.borrow().attributes, ECHO | ICANON);
    }
}
