//! Sample batch: what `pdfpull` does when run without a subcommand.

use anyhow::Result;
use pdfpull_core::config::PdfpullConfig;
use pdfpull_core::jitter::DelayRange;
use pdfpull_core::FetchSettings;

use super::run_batch;

pub(crate) const SAMPLE_URLS: &[&str] =
    &["https://www.resmigazete.gov.tr/eskiler/2025/01/20250121-27.pdf"];
pub(crate) const SAMPLE_SAVE_DIR: &str = "resmi_gazete_pdfs";

/// Config timeout, chunk size and proxies; fixed directory and a conservative 10–30 s delay.
pub(crate) fn sample_settings(cfg: &PdfpullConfig) -> Result<FetchSettings> {
    let mut settings = cfg.fetch_settings()?;
    settings.save_dir = SAMPLE_SAVE_DIR.into();
    settings.delay = DelayRange::new(10.0, 30.0)?;
    Ok(settings)
}

pub fn run_sample(cfg: &PdfpullConfig) -> Result<()> {
    let urls: Vec<String> = SAMPLE_URLS.iter().map(|u| u.to_string()).collect();
    run_batch(&urls, &sample_settings(cfg)?)
}
