//! Error types for the link state machine.

use thiserror::Error;

use crate::link::LinkState;

/// Errors from [`Link`](crate::Link) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// Invalid state transition attempted.
    #[error("invalid state transition: cannot {operation} from {state:?}")]
    InvalidTransition {
        /// State the link was in when the operation was attempted.
        state: LinkState,
        /// Operation that was attempted.
        operation: String,
    },
}
