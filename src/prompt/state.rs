//! Input loop states and the transitions shared by the raw-mode prompts.

/// Where an input loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting for the next key
    Editing,
    /// Checking the buffer; `submitted` is set when Enter triggered the check
    Validating { submitted: bool },
    /// A value was accepted; the loop ends
    Done,
}

impl LoopState {
    /// State after an edit keystroke for prompts that re-validate on every change.
    /// Keystrokes that left the buffer untouched do not trigger validation.
    pub fn after_edit(changed: bool) -> Self {
        if changed {
            LoopState::Validating { submitted: false }
        } else {
            LoopState::Editing
        }
    }

    /// State after validation: only a valid, submitted buffer finishes the loop.
    pub fn after_validation(valid: bool, submitted: bool) -> Self {
        if valid && submitted {
            LoopState::Done
        } else {
            LoopState::Editing
        }
    }

    pub fn is_done(self) -> bool {
        self == LoopState::Done
    }
}
