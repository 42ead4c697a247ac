// ── Winks Engine: HTTP Retry & Status Classification ───────────────────────
// Shared helpers for the Sensay directory client and the message dispatcher.
//
// Policy:
//   • Retry on 429 (rate limit), 500, 503 — nothing else.
//   • Linear backoff: 1s, 2s, 3s across the three retries.
//   • 404 classifies as NotFound; all other error statuses are permanent.
//   • Transport failures carry no status and are never retried.

use std::time::Duration;

use crate::atoms::traits::DirectoryError;

// ── Constants ──────────────────────────────────────────────────────────────

/// Maximum number of retry attempts per dispatch (4 total attempts including
/// the initial one).
pub const MAX_RETRIES: u32 = 3;

/// Base retry delay in milliseconds; scales linearly with the retry index.
const RETRY_BASE_DELAY_MS: u64 = 1_000;

// ── Retryable status detection ─────────────────────────────────────────────

/// Check if an HTTP status code represents a transient/retryable error.
pub fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 503)
}

// ── Backoff delay ──────────────────────────────────────────────────────────

/// Delay before retry `attempt` (0-based): base × (attempt + 1).
pub(crate) fn retry_delay_ms(attempt: u32) -> u64 {
    RETRY_BASE_DELAY_MS * (u64::from(attempt) + 1)
}

/// Sleep out the backoff for retry `attempt`.
/// Returns the actual delay duration for logging.
pub async fn retry_delay(attempt: u32) -> Duration {
    let delay = Duration::from_millis(retry_delay_ms(attempt));
    tokio::time::sleep(delay).await;
    delay
}

// ── Status classification ──────────────────────────────────────────────────

/// Map an HTTP error status and message excerpt onto the directory error
/// taxonomy. The single place raw statuses become typed errors.
pub fn classify_status(status: u16, message: String) -> DirectoryError {
    match status {
        404 => DirectoryError::NotFound(message),
        s if is_retryable_status(s) => DirectoryError::Transient { status: s, message },
        s => DirectoryError::Permanent { status: s, message },
    }
}

// ── Error-body excerpts ────────────────────────────────────────────────────

/// Truncate to at most `max_bytes`, backing up to a char boundary so an
/// excerpt never splits a multi-byte code point.
pub(crate) fn truncate_utf8(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

// ── Tests ──────────────────────────────────────────────────────────────────
