//! Per-item error taxonomy.
//!
//! Every failure inside one item is turned into an [`ItemError`]; the batch
//! driver only has to ask whether it stops the batch.

mod classify;

use thiserror::Error;

pub use classify::classify;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemError {
    /// HTTP 429. Stops the remaining batch.
    #[error("rate limited (HTTP 429)")]
    RateLimited,

    /// Any other 4xx/5xx status.
    #[error("HTTP error {status}")]
    Http { status: u32 },

    /// Connection, DNS, timeout or malformed response.
    #[error("transport error: {0}")]
    Transport(String),

    /// Anything else that went wrong while handling the item (local I/O, panics).
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl ItemError {
    /// True only for a rate-limit response.
    pub fn is_batch_fatal(&self) -> bool {
        matches!(self, ItemError::RateLimited)
    }
}
