//! Error types and handling infrastructure for keyprompt.
//!
//! Only environment failures travel through this module. Validation failures are
//! rendering state inside a running prompt and never become a [`PromptError`].
//!
//! ## Design Principles
//!
//! - **Fatal by default**: a failed attribute query/update leaves the terminal in an
//!   unknown state, so it is surfaced to the caller instead of being retried
//! - **Context preservation**: every OS error keeps its `io::Error` source
//! - **Consistency**: standardized Result type across all modules

use thiserror::Error;

/// The main error type for keyprompt operations.
#[derive(Error, Debug)]
pub enum PromptError {
    /// Querying or updating terminal attributes failed
    #[error("Terminal attribute operation failed: {message}")]
    TerminalAttributes {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Raw mode was requested but stdin is not attached to a terminal
    #[error("Standard input is not a terminal")]
    NotATerminal,

    /// The input stream ended before a value was accepted
    #[error("Input stream closed before a value was accepted")]
    InputClosed,

    /// Reading input or writing output failed
    #[error("I/O operation failed: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Theme configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Standard Result type for keyprompt operations.
pub type Result<T> = std::result::Result<T, PromptError>;

impl PromptError {
    /// Create a TerminalAttributes error from an io::Error with additional context
    pub fn terminal(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::TerminalAttributes {
            message: message.into(),
            source,
        }
    }

    /// Create an Io error from an io::Error with additional context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a Config error with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for PromptError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof => Self::InputClosed,
            std::io::ErrorKind::BrokenPipe => Self::Io {
                message: "Output closed".to_string(),
                source: err,
            },
            _ => Self::Io {
                message: "Terminal I/O failed".to_string(),
                source: err,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let not_tty = PromptError::NotATerminal;
        assert_eq!(not_tty.to_string(), "Standard input is not a terminal");

        let closed = PromptError::InputClosed;
        assert_eq!(
            closed.to_string(),
            "Input stream closed before a value was accepted"
        );

        let attrs = PromptError::terminal(
            "tcgetattr",
            std::io::Error::new(std::io::ErrorKind::Other, "bad fd"),
        );
        assert_eq!(
            attrs.to_string(),
            "Terminal attribute operation failed: tcgetattr"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let eof = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        assert!(matches!(PromptError::from(eof), PromptError::InputClosed));

        let pipe = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe");
        match PromptError::from(pipe) {
            PromptError::Io { message, .. } => assert_eq!(message, "Output closed"),
            other => panic!("Expected Io variant, got {other:?}"),
        }
    }

    #[test]
    fn test_source_is_preserved() {
        use std::error::Error as _;

        let err = PromptError::io(
            "flush",
            std::io::Error::new(std::io::ErrorKind::Other, "disk on fire"),
        );
        let source = err.source().expect("source should be kept");
        assert_eq!(source.to_string(), "disk on fire");
    }
}
