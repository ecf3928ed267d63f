//! Error types for session handling.

use thiserror::Error;

use crate::types::Step;

/// Errors produced by the session state machine.
///
/// Neither variant is fatal to the session: an `InvalidTransition` leaves the
/// machine exactly where it was, and an `IndexOutOfRange` aborts only the
/// offending alternate swap.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The intent makes no sense in the current step.
    #[error("Invalid transition: cannot {intent} during the {step:?} step")]
    InvalidTransition { step: Step, intent: &'static str },

    /// A display position past the end of the alternates view. This comes
    /// from a misbehaving caller, not from anything a user can do.
    #[error("Alternate position {position} out of range ({available} alternates available)")]
    IndexOutOfRange { position: usize, available: usize },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, SessionError>;
