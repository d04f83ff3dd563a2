//! Map transport failures onto item errors.

use super::ItemError;
use crate::transport::TransportError;

const TOO_MANY_REQUESTS: u32 = 429;

/// Classify a transport failure for the batch driver.
pub fn classify(err: &TransportError) -> ItemError {
    match err {
        TransportError::Status(TOO_MANY_REQUESTS) => ItemError::RateLimited,
        TransportError::Status(status) => ItemError::Http { status: *status },
        TransportError::InvalidUrl { .. } | TransportError::Curl(_) => {
            ItemError::Transport(err.to_string())
        }
        TransportError::Sink(e) => ItemError::Unexpected(e.to_string()),
    }
}
