//! CLI for pdfpull.

mod commands;
mod console;
mod url_list;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use pdfpull_core::config;
use std::path::PathBuf;

use commands::{run_fetch, run_sample};

/// Top-level CLI. With no subcommand the sample batch runs.
#[derive(Debug, Parser)]
#[command(name = "pdfpull")]
#[command(about = "pdfpull: polite, sequential PDF downloader", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download URLs one at a time, skipping files that already exist.
    Fetch(FetchArgs),

    /// Download the built-in sample (same as running without a subcommand).
    Sample,
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Direct HTTP/HTTPS URLs, processed in the order given.
    pub urls: Vec<String>,

    /// Read more URLs from a file: one per line, blank lines and `#` comments ignored.
    #[arg(long, value_name = "PATH")]
    pub from_file: Option<PathBuf>,

    /// Directory to save into (created if missing).
    #[arg(long, value_name = "DIR")]
    pub save_dir: Option<PathBuf>,

    /// Lower bound of the random delay between requests, in seconds.
    #[arg(long, value_name = "SECS")]
    pub min_delay: Option<f64>,

    /// Upper bound of the random delay between requests, in seconds.
    #[arg(long, value_name = "SECS")]
    pub max_delay: Option<f64>,

    /// Proxy for one URL scheme, e.g. `http=http://10.10.1.10:3128`. Repeatable.
    /// Schemes without a proxy connect directly; http_proxy/https_proxy env vars are not used.
    #[arg(long = "proxy", value_name = "SCHEME=URL", value_parser = parse_proxy)]
    pub proxies: Vec<(String, String)>,
}

fn parse_proxy(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((scheme, proxy)) if !scheme.trim().is_empty() && !proxy.trim().is_empty() => {
            Ok((scheme.trim().to_string(), proxy.trim().to_string()))
        }
        _ => Err(format!("expected SCHEME=URL, got {:?}", s)),
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command.unwrap_or(CliCommand::Sample) {
            CliCommand::Fetch(args) => run_fetch(&cfg, &args)?,
            CliCommand::Sample => run_sample(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
