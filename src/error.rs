//! Crate-wide error type.
//!
//! Only the run loop can fail. Operations on a component that is not
//! running degrade to no-ops and never produce an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Terminal setup, drawing or restoration failed.
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The program was stopped with `kill` before it quit on its own.
    #[error("program was killed")]
    Killed,

    /// `start` was called on a host that already owns a running program.
    #[error("component is already started")]
    AlreadyStarted,

    /// The thread driving the run loop panicked.
    #[error("run loop panicked: {0}")]
    Panicked(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

// In-memory backends cannot fail.
impl From<std::convert::Infallible> for Error {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

impl Error {
    /// True when the run loop ended because of an explicit kill.
    pub fn is_killed(&self) -> bool {
        matches!(self, Error::Killed)
    }
}
