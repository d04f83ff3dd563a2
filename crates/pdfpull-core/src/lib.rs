pub mod config;
pub mod logging;

pub mod fetcher;
pub mod jitter;
pub mod outcome;
pub mod profile;
pub mod transport;
pub mod url_model;

pub use fetcher::{fetch_all, BatchReport, FetchEvent, FetchSettings, Fetcher, ItemOutcome};
