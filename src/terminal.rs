//! Terminal Mode Controller.
//!
//! Owns the process-wide raw-mode state of the controlling terminal. Prompts reach it
//! through [`SystemTerminal`], which implements [`ModeControl`]; tests substitute their
//! own `ModeControl` so no real tty is needed.

pub mod mode;
pub mod teardown;
pub mod tty;

pub use mode::{ModeControl, RawMode, RawModeGuard, RawModeState, TerminalDevice};
pub use teardown::{restore_terminal, TeardownSlot};
pub use tty::Tty;

use crate::error::{PromptError, Result};
use crossterm::tty::IsTty;
use std::io;
use std::sync::{Mutex, MutexGuard};

static RAW_MODE: Mutex<Option<RawModeState<Tty>>> = Mutex::new(None);

fn lock_state() -> MutexGuard<'static, Option<RawModeState<Tty>>> {
    // A poisoned lock only means a previous prompt panicked mid-update; the
    // attribute snapshot inside is still the one to restore.
    RAW_MODE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Put the controlling terminal into raw mode.
///
/// Captures the original attributes on the first call and arms the teardown hooks
/// so a panic, `exit`, or terminating signal restores them. Calls are not
/// reference-counted: every enter must be balanced by the caller.
pub fn enter_raw_mode() -> Result<()> {
    if !io::stdin().is_tty() {
        return Err(PromptError::NotATerminal);
    }

    let mut guard = lock_state();
    let state = guard.get_or_insert_with(|| RawModeState::new(Tty::stdin()));
    enter_armed(state, teardown::global_slot())
}

/// Restore the attributes captured by [`enter_raw_mode`] and show the cursor.
pub fn exit_raw_mode() -> Result<()> {
    let mut guard = lock_state();
    match guard.as_mut() {
        Some(state) => exit_armed(state, teardown::global_slot()),
        None => Ok(()),
    }
}

/// Enter raw mode on `state` with `slot` armed before the device leaves
/// cooked mode.
///
/// When entering fails the teardown stays armed only if the device could not be
/// put back into its original mode. The process-wide hooks fire only the slot
/// behind [`restore_terminal`]; any other slot is fired by its owner.
pub fn enter_armed<D: TerminalDevice>(
    state: &mut RawModeState<D>,
    slot: &TeardownSlot<D::Attributes>,
) -> Result<()> {
    let original = state.capture_original()?;
    teardown::arm(slot, &original);
    if let Err(err) = state.enter() {
        if state.mode() == RawMode::Off {
            teardown::disarm(slot);
        }
        return Err(err);
    }
    Ok(())
}

/// Leave raw mode on `state` and disarm `slot` once the original attributes
/// are back.
pub fn exit_armed<D: TerminalDevice>(
    state: &mut RawModeState<D>,
    slot: &TeardownSlot<D::Attributes>,
) -> Result<()> {
    state.exit()?;
    teardown::disarm(slot);
    Ok(())
}

/// Current raw-mode state of the controlling terminal.
pub fn raw_mode() -> RawMode {
    lock_state()
        .as_ref()
        .map(RawModeState::mode)
        .unwrap_or(RawMode::Off)
}

/// Handle on the process's controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTerminal;

impl ModeControl for SystemTerminal {
    fn enter_raw_mode(&mut self) -> Result<()> {
        enter_raw_mode()
    }

    fn exit_raw_mode(&mut self) -> Result<()> {
        exit_raw_mode()
    }
}

/// Mode control that never touches a terminal, for prompts driven by scripted input.
#[derive(Debug, Default, Clone, Copy)]
pub struct Detached;

impl ModeControl for Detached {
    fn enter_raw_mode(&mut self) -> Result<()> {
        Ok(())
    }

    fn exit_raw_mode(&mut self) -> Result<()> {
        Ok(())
    }
}
