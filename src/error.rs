//! Error type for API misuse.
//!
//! Degenerate list states (nothing matches, nothing active, odd predicate
//! output) never produce errors; they resolve to "no item" states. Only calls
//! that would break a component's construction-time contract end up here.

use thiserror::Error;

/// Errors surfaced by the query list and the widgets built on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The caller tried to switch an active-item source between controlled
    /// and uncontrolled after construction.
    #[error(
        "active item is {} and cannot become {}",
        mode_name(*.controlled),
        mode_name(!*.controlled)
    )]
    ControlModeChange {
        /// Whether the list was built in controlled mode.
        controlled: bool,
    },
}

fn mode_name(controlled: bool) -> &'static str {
    if controlled {
        "controlled"
    } else {
        "uncontrolled"
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
