// ── Winks Atoms: Error Types ───────────────────────────────────────────────
// Single canonical error enum for the engine, built with `thiserror`.
//
// Design rules:
//   • Directory failures keep their full `DirectoryError` classification so
//     callers can tell a structured API error from a plain network failure.
//   • Configuration problems short-circuit before any network call.
//   • No variant carries secret material (the organization secret never
//     appears in a message).

use thiserror::Error;

use crate::atoms::traits::DirectoryError;

// ── Primary error enum ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum EngineError {
    /// A classified failure from the remote directory service.
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// Engine configuration is invalid or missing (e.g. no API secret).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catch-all for errors that do not yet have a dedicated variant.
    /// Prefer adding a specific variant over using this in new code.
    #[error("{0}")]
    Other(String),
}

impl EngineError {
    /// The classified directory failure, when that is what this error wraps.
    pub fn directory(&self) -> Option<&DirectoryError> {
        match self {
            EngineError::Directory(err) => Some(err),
            _ => None,
        }
    }
}

// ── Convenience alias ──────────────────────────────────────────────────────

/// All public engine operations return this type.
pub type EngineResult<T> = Result<T, EngineError>;
