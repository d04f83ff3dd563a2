//! HTTP transport seam.
//!
//! The batch driver only needs "GET this URL and push the body into a sink";
//! [`CurlTransport`] does that with libcurl, tests substitute scripted transports.

mod easy;

use std::io;
use std::time::Duration;
use thiserror::Error;

use crate::profile::HeaderProfile;

pub use easy::CurlTransport;

/// One GET request.
#[derive(Debug, Clone, Copy)]
pub struct FetchRequest<'a> {
    pub url: &'a str,
    pub headers: HeaderProfile,
    pub proxy: Option<&'a str>,
    /// Total time allowed for the whole request.
    pub timeout: Duration,
    /// Upper bound on the size of each body chunk handed to the sink.
    pub chunk_size: usize,
}

/// Why a request did not deliver a complete 2xx body.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Server answered with a 4xx/5xx status. No body was delivered.
    #[error("HTTP {0}")]
    Status(u32),

    /// URL that cannot be requested (unparseable or not http/https).
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// libcurl failure: connect, DNS, timeout, malformed response, ...
    #[error("{0}")]
    Curl(#[from] curl::Error),

    /// The body sink failed (disk full, permission denied, ...).
    #[error("write failed: {0}")]
    Sink(#[source] io::Error),
}

/// Blocking HTTP GET with a streamed body.
pub trait Transport {
    /// Performs the request, passing each received chunk to `sink` in order.
    /// Returns `Ok(())` only for a complete response with a status below 400.
    fn get(
        &mut self,
        request: &FetchRequest<'_>,
        sink: &mut dyn FnMut(&[u8]) -> io::Result<()>,
    ) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn get(
        &mut self,
        request: &FetchRequest<'_>,
        sink: &mut dyn FnMut(&[u8]) -> io::Result<()>,
    ) -> Result<(), TransportError> {
        (**self).get(request, sink)
    }
}
