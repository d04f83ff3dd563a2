//! Batch fetcher: sequential, jittered, header-rotating downloads.
//!
//! Items are processed strictly in order on the calling thread. Before every
//! item except the first a random delay is slept. An item whose destination
//! already exists is skipped without touching the network. Every failure is
//! contained to its item, except HTTP 429 which stops the batch.

mod event;
mod item;
mod report;

use anyhow::{Context, Result};
use std::any::Any;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{ProxyMap, DEFAULT_CHUNK_SIZE, DEFAULT_SAVE_DIR, DEFAULT_TIMEOUT_SECS};
use crate::jitter::{DelayRange, RandomSource, Sleeper, ThreadSleeper};
use crate::outcome::ItemError;
use crate::profile::select_profile;
use crate::transport::{CurlTransport, FetchRequest, Transport};
use crate::url_model::{destination_name, destination_path, part_path};

pub use event::FetchEvent;
pub use report::{BatchReport, ItemOutcome};

/// Read-only configuration for one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchSettings {
    pub save_dir: PathBuf,
    pub delay: DelayRange,
    pub proxies: ProxyMap,
    pub timeout: Duration,
    pub chunk_size: usize,
}

impl FetchSettings {
    /// Settings with the default timeout and chunk size.
    pub fn new(save_dir: impl Into<PathBuf>, delay: DelayRange, proxies: Option<ProxyMap>) -> Self {
        Self {
            save_dir: save_dir.into(),
            delay,
            proxies: proxies.unwrap_or_default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self::new(DEFAULT_SAVE_DIR, DelayRange::default(), None)
    }
}

pub struct Fetcher<T, R, S> {
    settings: FetchSettings,
    transport: T,
    rng: R,
    sleeper: S,
}

impl<T: Transport, R: RandomSource, S: Sleeper> Fetcher<T, R, S> {
    pub fn new(settings: FetchSettings, transport: T, rng: R, sleeper: S) -> Self {
        Self {
            settings,
            transport,
            rng,
            sleeper,
        }
    }

    /// Processes `urls` in order, reporting each step to `observer`.
    ///
    /// Returns `Err` only when the save directory cannot be created; item
    /// failures are recorded in the report.
    pub fn run<F>(&mut self, urls: &[String], mut observer: F) -> Result<BatchReport>
    where
        F: FnMut(&FetchEvent<'_>),
    {
        let save_dir = &self.settings.save_dir;
        fs::create_dir_all(save_dir)
            .with_context(|| format!("create save directory {}", save_dir.display()))?;

        let total = urls.len();
        let mut report = BatchReport::default();
        tracing::info!(
            total,
            save_dir = %self.settings.save_dir.display(),
            "starting batch"
        );

        for (index, url) in urls.iter().enumerate() {
            if index > 0 {
                let delay = self.settings.delay.sample(&mut self.rng);
                observer(&FetchEvent::Waiting { delay });
                self.sleeper.sleep(delay);
            }

            let outcome = self.fetch_item(index, total, url, &mut observer);
            let abort = matches!(&outcome, ItemOutcome::Failed(e) if e.is_batch_fatal());
            report.items.push((url.clone(), outcome));
            if abort {
                report.aborted = true;
                tracing::warn!(
                    remaining = total - index - 1,
                    "rate limited, aborting batch"
                );
                break;
            }
        }

        tracing::info!(
            saved = report.saved(),
            skipped = report.skipped(),
            failed = report.failed(),
            aborted = report.aborted,
            "batch finished"
        );
        Ok(report)
    }

    fn fetch_item<F>(&mut self, index: usize, total: usize, url: &str, observer: &mut F) -> ItemOutcome
    where
        F: FnMut(&FetchEvent<'_>),
    {
        let filename = destination_name(url);
        let destination = destination_path(&self.settings.save_dir, url);
        if destination.exists() {
            observer(&FetchEvent::Skipped { filename });
            tracing::debug!(url, path = %destination.display(), "destination exists, skipping");
            return ItemOutcome::Skipped(destination);
        }

        let request = FetchRequest {
            url,
            headers: select_profile(&mut self.rng),
            proxy: self.settings.proxies.for_url(url),
            timeout: self.settings.timeout,
            chunk_size: self.settings.chunk_size,
        };
        observer(&FetchEvent::Downloading {
            position: index + 1,
            total,
            filename,
        });
        tracing::debug!(
            url,
            user_agent = request.headers.user_agent,
            proxy = ?request.proxy,
            "GET"
        );

        let transport = &mut self.transport;
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            item::download_to(transport, &request, &destination)
        }))
        .unwrap_or_else(|payload| {
            item::discard(&part_path(&destination));
            Err(ItemError::Unexpected(panic_message(payload.as_ref())))
        });

        match result {
            Ok(bytes) => {
                observer(&FetchEvent::Saved { path: &destination });
                tracing::info!(url, bytes, path = %destination.display(), "saved");
                ItemOutcome::Saved(destination)
            }
            Err(err) => {
                report_failure(url, &err, observer);
                ItemOutcome::Failed(err)
            }
        }
    }
}

fn report_failure<F>(url: &str, err: &ItemError, observer: &mut F)
where
    F: FnMut(&FetchEvent<'_>),
{
    tracing::warn!(url, error = %err, "item failed");
    match err {
        ItemError::RateLimited => observer(&FetchEvent::RateLimited { url }),
        ItemError::Http { status } => observer(&FetchEvent::HttpError {
            status: *status,
            url,
        }),
        ItemError::Transport(detail) => observer(&FetchEvent::TransportFailed { url, detail }),
        ItemError::Unexpected(detail) => observer(&FetchEvent::Unexpected { detail }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic while fetching".to_string()
    }
}

/// Downloads `urls` into `settings.save_dir` with libcurl, real randomness and real sleeps.
pub fn fetch_all<F>(urls: &[String], settings: &FetchSettings, observer: F) -> Result<BatchReport>
where
    F: FnMut(&FetchEvent<'_>),
{
    let mut fetcher = Fetcher::new(
        settings.clone(),
        CurlTransport::new(),
        fastrand::Rng::new(),
        ThreadSleeper,
    );
    fetcher.run(urls, observer)
}
