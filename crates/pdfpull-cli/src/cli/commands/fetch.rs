//! `pdfpull fetch` – download an explicit URL list.

use anyhow::{Context, Result};
use pdfpull_core::config::PdfpullConfig;
use pdfpull_core::FetchSettings;

use super::run_batch;
use crate::cli::url_list::read_url_list;
use crate::cli::FetchArgs;

/// Config file values with command-line overrides applied.
pub(crate) fn resolve_settings(cfg: &PdfpullConfig, args: &FetchArgs) -> Result<FetchSettings> {
    let mut cfg = cfg.clone();
    if let Some(dir) = &args.save_dir {
        cfg.save_dir = dir.clone();
    }
    if let Some(min) = args.min_delay {
        cfg.delay.min_secs = min;
    }
    if let Some(max) = args.max_delay {
        cfg.delay.max_secs = max;
    }
    for (scheme, proxy) in &args.proxies {
        cfg.proxies.insert(scheme, proxy);
    }
    cfg.fetch_settings().context("invalid fetch settings")
}

pub fn run_fetch(cfg: &PdfpullConfig, args: &FetchArgs) -> Result<()> {
    let mut urls = args.urls.clone();
    if let Some(path) = &args.from_file {
        urls.extend(read_url_list(path)?);
    }
    if urls.is_empty() {
        anyhow::bail!("no URLs given (pass URLs or --from-file)");
    }
    let settings = resolve_settings(cfg, args)?;
    tracing::info!(count = urls.len(), "fetch {} url(s)", urls.len());
    run_batch(&urls, &settings)
}
