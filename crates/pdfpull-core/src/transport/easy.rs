//! libcurl transport: one easy handle per request, body streamed through the write callback.

use curl::easy::{Easy, List};
use std::io;

use super::{FetchRequest, Transport, TransportError};

/// Redirect limit, matching common browser/client defaults.
const MAX_REDIRECTIONS: u32 = 30;

#[derive(Debug, Default, Clone, Copy)]
pub struct CurlTransport;

impl CurlTransport {
    pub fn new() -> Self {
        Self
    }
}

fn check_url(url: &str) -> Result<(), TransportError> {
    let parsed = url::Url::parse(url).map_err(|e| TransportError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(TransportError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme {:?}", other),
        }),
    }
}

impl Transport for CurlTransport {
    fn get(
        &mut self,
        request: &FetchRequest<'_>,
        sink: &mut dyn FnMut(&[u8]) -> io::Result<()>,
    ) -> Result<(), TransportError> {
        check_url(request.url)?;

        let mut easy = Easy::new();
        easy.url(request.url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(MAX_REDIRECTIONS)?;
        // 4xx/5xx end the transfer before any body reaches the sink.
        easy.fail_on_error(true)?;
        easy.connect_timeout(request.timeout)?;
        // Whole-transfer deadline, not an idle timeout: slow large bodies can hit it.
        easy.timeout(request.timeout)?;
        easy.buffer_size(request.chunk_size)?;
        // An empty proxy string means a direct connection, ignoring *_proxy env vars.
        easy.proxy(request.proxy.unwrap_or(""))?;

        let mut list = List::new();
        for line in request.headers.header_lines() {
            list.append(&line)?;
        }
        easy.http_headers(list)?;

        let mut sink_error: Option<io::Error> = None;
        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| match sink(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    sink_error = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };

        if let Err(e) = performed {
            if let Some(io_err) = sink_error.take() {
                return Err(TransportError::Sink(io_err));
            }
            if e.is_http_returned_error() {
                let code = easy.response_code()?;
                return Err(TransportError::Status(code));
            }
            return Err(TransportError::Curl(e));
        }

        let code = easy.response_code()?;
        if code >= 400 {
            return Err(TransportError::Status(code));
        }
        tracing::debug!(url = request.url, status = code, "GET complete");
        Ok(())
    }
}
