//! CLI command handlers.

mod fetch;
mod sample;

use anyhow::Result;
use pdfpull_core::{fetch_all, FetchSettings};

use super::console::ConsoleReporter;

pub use fetch::run_fetch;
pub use sample::run_sample;

#[cfg(test)]
pub(crate) use fetch::resolve_settings;
#[cfg(test)]
pub(crate) use sample::{sample_settings, SAMPLE_SAVE_DIR, SAMPLE_URLS};

/// Runs one batch, printing a line per event and a summary at the end.
fn run_batch(urls: &[String], settings: &FetchSettings) -> Result<()> {
    let mut console = ConsoleReporter::new(std::io::stdout());
    let report = fetch_all(urls, settings, |event| console.event(event))?;
    console.summary(&report);
    Ok(())
}
