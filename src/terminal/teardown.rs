//! Last-resort terminal restoration.
//!
//! Once raw mode has been entered, a panic hook and an `atexit` hook are installed
//! for the rest of the process, and (on Unix) handlers for terminating signals are
//! installed for as long as raw mode is live. Each of them fires the shared
//! [`TeardownSlot`], which restores the attributes captured on first activation and
//! re-shows the cursor, but only while raw mode is actually live.
//!
//! Signal handlers displace whatever disposition the host process had and put it
//! back on disarm. Signals the host ignores are left alone.

use super::tty::{self, Attributes};
use log::debug;
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

/// Snapshot plus an armed flag, readable without locks so signal handlers can use it.
pub struct TeardownSlot<A> {
    saved: OnceLock<A>,
    armed: AtomicBool,
}

impl<A> TeardownSlot<A> {
    pub const fn new() -> Self {
        Self {
            saved: OnceLock::new(),
            armed: AtomicBool::new(false),
        }
    }

    /// Record `attributes` (first call wins) and arm the slot.
    pub fn arm(&self, attributes: &A)
    where
        A: Clone,
    {
        self.saved.get_or_init(|| attributes.clone());
        self.armed.store(true, Ordering::SeqCst);
    }

    pub fn disarm(&self) {
        self.armed.store(false, Ordering::SeqCst);
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }

    /// Run `restore` with the saved snapshot if armed; fires at most once per arming.
    pub fn fire(&self, restore: impl FnOnce(&A)) -> bool {
        if !self.armed.swap(false, Ordering::SeqCst) {
            return false;
        }
        match self.saved.get() {
            Some(attributes) => {
                restore(attributes);
                true
            }
            None => false,
        }
    }
}

impl<A> Default for TeardownSlot<A> {
    fn default() -> Self {
        Self::new()
    }
}

static SLOT: TeardownSlot<Attributes> = TeardownSlot::new();
static HOOKS_INSTALLED: OnceLock<()> = OnceLock::new();

/// The slot fired by the process-wide hooks.
pub(crate) fn global_slot() -> &'static TeardownSlot<Attributes> {
    &SLOT
}

/// Arm `slot` with the captured original attributes.
///
/// Installs the panic and exit hooks on first use and the signal handlers until the
/// next [`disarm`].
pub(crate) fn arm<A: Clone>(slot: &TeardownSlot<A>, original: &A) {
    slot.arm(original);
    HOOKS_INSTALLED.get_or_init(|| {
        install_panic_hook();
        install_exit_hook();
        debug!("terminal teardown hooks installed");
    });
    signals::install();
}

/// Raw mode was left normally; hooks have nothing to undo and the host's signal
/// dispositions come back.
pub(crate) fn disarm<A>(slot: &TeardownSlot<A>) {
    slot.disarm();
    signals::uninstall();
}

/// Restore the terminal if raw mode is live. Safe to call from any exit path.
pub fn restore_terminal() -> bool {
    SLOT.fire(tty::restore_from_hook)
}

fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        restore_terminal();
        previous(info);
    }));
}

extern "C" fn on_process_exit() {
    restore_terminal();
}

fn install_exit_hook() {
    // SAFETY: registering a plain extern "C" fn with no captured state.
    let rc = unsafe { libc::atexit(on_process_exit) };
    if rc != 0 {
        debug!("atexit registration failed; relying on panic hook and guards");
    }
}

#[cfg(unix)]
mod signals {
    use super::restore_terminal;
    use log::debug;
    use std::cell::UnsafeCell;
    use std::mem::{self, MaybeUninit};
    use std::ptr;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Mutex, PoisonError};

    pub(super) const TERMINATING: [libc::c_int; 4] =
        [libc::SIGINT, libc::SIGTERM, libc::SIGHUP, libc::SIGQUIT];

    /// Host dispositions displaced by [`on_terminating_signal`], one per entry of
    /// [`TERMINATING`].
    struct Displaced {
        actions: [UnsafeCell<MaybeUninit<libc::sigaction>>; 4],
        active: [AtomicBool; 4],
    }

    // SAFETY: an action is written only while its `active` flag is clear, before
    // the handler for that signal is installed, and read only after the flag has
    // been observed set.
    unsafe impl Sync for Displaced {}

    static DISPLACED: Displaced = Displaced {
        actions: [
            UnsafeCell::new(MaybeUninit::uninit()),
            UnsafeCell::new(MaybeUninit::uninit()),
            UnsafeCell::new(MaybeUninit::uninit()),
            UnsafeCell::new(MaybeUninit::uninit()),
        ],
        active: [
            AtomicBool::new(false),
            AtomicBool::new(false),
            AtomicBool::new(false),
            AtomicBool::new(false),
        ],
    };

    /// Serialises install/uninstall; never taken inside the handler.
    static UPDATE: Mutex<()> = Mutex::new(());

    pub(super) extern "C" fn on_terminating_signal(signal: libc::c_int) {
        restore_terminal();
        reinstate(signal);
        // SAFETY: raise is async-signal-safe. The signal stays blocked until this
        // handler returns, then reaches the host's own disposition.
        unsafe {
            libc::raise(signal);
        }
    }

    /// Put back the displaced disposition of `signal`, or the default one.
    fn reinstate(signal: libc::c_int) {
        let index = TERMINATING.iter().position(|&candidate| candidate == signal);
        // SAFETY: sigaction and signal are async-signal-safe; the saved action was
        // fully written before `active` was set.
        unsafe {
            match index {
                Some(index) if DISPLACED.active[index].swap(false, Ordering::AcqRel) => {
                    libc::sigaction(
                        signal,
                        (*DISPLACED.actions[index].get()).as_ptr(),
                        ptr::null_mut(),
                    );
                }
                _ => {
                    libc::signal(signal, libc::SIG_DFL);
                }
            }
        }
    }

    pub(super) fn install() {
        let _update = UPDATE.lock().unwrap_or_else(PoisonError::into_inner);
        for (index, &signal) in TERMINATING.iter().enumerate() {
            if DISPLACED.active[index].load(Ordering::Acquire) {
                continue;
            }
            // SAFETY: zeroed sigaction is valid; the slot for `index` is inactive, so
            // no handler reads it while it is written.
            unsafe {
                let mut previous: libc::sigaction = mem::zeroed();
                if libc::sigaction(signal, ptr::null(), &mut previous) != 0 {
                    continue;
                }
                if previous.sa_sigaction == libc::SIG_IGN {
                    debug!("signal {signal} is ignored by the host, not hooking it");
                    continue;
                }
                (*DISPLACED.actions[index].get()).write(previous);
                DISPLACED.active[index].store(true, Ordering::Release);

                let mut action: libc::sigaction = mem::zeroed();
                action.sa_sigaction = on_terminating_signal as libc::sighandler_t;
                libc::sigemptyset(&mut action.sa_mask);
                action.sa_flags = 0;
                if libc::sigaction(signal, &action, ptr::null_mut()) != 0 {
                    DISPLACED.active[index].store(false, Ordering::Release);
                }
            }
        }
    }

    pub(super) fn uninstall() {
        let _update = UPDATE.lock().unwrap_or_else(PoisonError::into_inner);
        for (index, &signal) in TERMINATING.iter().enumerate() {
            if !DISPLACED.active[index].swap(false, Ordering::AcqRel) {
                continue;
            }
            // SAFETY: the action was written before `active` was set and nothing
            // rewrites it until the next install.
            unsafe {
                libc::sigaction(
                    signal,
                    (*DISPLACED.actions[index].get()).as_ptr(),
                    ptr::null_mut(),
                );
            }
        }
    }
}

#[cfg(not(unix))]
mod signals {
    pub(super) fn install() {}
    pub(super) fn uninstall() {}
}
