//! Progress events emitted while a batch runs.

use std::fmt;
use std::path::Path;
use std::time::Duration;

/// One step of a batch, in the order it happened. `Display` gives the console line.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchEvent<'a> {
    /// About to sleep before the next request.
    Waiting { delay: Duration },
    /// Destination already on disk; no request made.
    Skipped { filename: &'a str },
    /// Request for item `position` of `total` (1-based) is starting.
    Downloading {
        position: usize,
        total: usize,
        filename: &'a str,
    },
    Saved { path: &'a Path },
    /// HTTP 429; nothing further is requested in this batch.
    RateLimited { url: &'a str },
    HttpError { status: u32, url: &'a str },
    TransportFailed { url: &'a str, detail: &'a str },
    Unexpected { detail: &'a str },
}

impl fmt::Display for FetchEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchEvent::Waiting { delay } => write!(
                f,
                "Waiting {:.1} seconds before next request...",
                delay.as_secs_f64()
            ),
            FetchEvent::Skipped { filename } => write!(f, "Skipping existing file: {}", filename),
            FetchEvent::Downloading {
                position,
                total,
                filename,
            } => write!(f, "Downloading ({}/{}): {}", position, total, filename),
            FetchEvent::Saved { path } => write!(f, "Successfully saved: {}", path.display()),
            FetchEvent::RateLimited { .. } => {
                write!(f, "Rate limited - consider increasing delays or using proxies")
            }
            FetchEvent::HttpError { status, url } => write!(f, "HTTP Error {} for {}", status, url),
            FetchEvent::TransportFailed { url, detail } => {
                write!(f, "Failed to download {}: {}", url, detail)
            }
            FetchEvent::Unexpected { detail } => write!(f, "Unexpected error: {}", detail),
        }
    }
}
