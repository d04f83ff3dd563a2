use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::fetcher::FetchSettings;
use crate::jitter::DelayRange;

/// Default directory the batch writes into.
pub const DEFAULT_SAVE_DIR: &str = "downloaded_pdfs";
/// Total per-request timeout in seconds (connect + transfer).
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
/// Receive buffer size; the body is streamed to disk in chunks of at most this many bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Invalid settings detected before any request is made.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid delay range {min}..{max}: bounds must be non-negative seconds within Duration range, with min <= max")]
    InvalidDelay { min: f64, max: f64 },

    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,

    #[error("timeout must be greater than zero")]
    ZeroTimeout,
}

/// Delay between consecutive requests, in seconds (`[delay]` section in config.toml).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayConfig {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            min_secs: 5.0,
            max_secs: 15.0,
        }
    }
}

/// Static scheme -> proxy URL map, passed unchanged to every request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProxyMap(BTreeMap<String, String>);

impl ProxyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the proxy for `scheme` (stored lowercase).
    pub fn insert(&mut self, scheme: &str, proxy: &str) {
        self.0.insert(scheme.to_ascii_lowercase(), proxy.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Proxy configured for the scheme of `url`, if any.
    pub fn for_url(&self, url: &str) -> Option<&str> {
        let parsed = url::Url::parse(url).ok()?;
        self.0.get(parsed.scheme()).map(String::as_str)
    }
}

impl FromIterator<(String, String)> for ProxyMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = ProxyMap::new();
        for (scheme, proxy) in iter {
            map.insert(&scheme, &proxy);
        }
        map
    }
}

/// Configuration loaded from `~/.config/pdfpull/config.toml`. Every field is optional in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfpullConfig {
    /// Directory downloads are written to.
    pub save_dir: PathBuf,
    /// Random delay range between requests.
    pub delay: DelayConfig,
    /// Total timeout for one request, in seconds.
    pub timeout_secs: u64,
    /// Streaming chunk size in bytes.
    pub chunk_size: usize,
    /// Scheme -> proxy URL (`[proxies]` table).
    pub proxies: ProxyMap,
}

impl Default for PdfpullConfig {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from(DEFAULT_SAVE_DIR),
            delay: DelayConfig::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            proxies: ProxyMap::default(),
        }
    }
}

impl PdfpullConfig {
    /// Validates the config and turns it into settings for one batch.
    pub fn fetch_settings(&self) -> Result<FetchSettings, ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(FetchSettings {
            save_dir: self.save_dir.clone(),
            delay: DelayRange::new(self.delay.min_secs, self.delay.max_secs)?,
            proxies: self.proxies.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            chunk_size: self.chunk_size,
        })
    }
}

/// Location of an existing config file, if the user created one.
pub fn find_config_path() -> Result<Option<PathBuf>> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pdfpull")?;
    Ok(xdg_dirs.find_config_file("config.toml"))
}

/// Load configuration from disk. A missing file means built-in defaults; nothing is written.
pub fn load() -> Result<PdfpullConfig> {
    match find_config_path()? {
        Some(path) => load_from_path(&path),
        None => Ok(PdfpullConfig::default()),
    }
}

pub fn load_from_path(path: &Path) -> Result<PdfpullConfig> {
    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: PdfpullConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_values() {
        let cfg = PdfpullConfig::default();
        assert_eq!(cfg.save_dir, PathBuf::from("downloaded_pdfs"));
        assert_eq!(cfg.delay.min_secs, 5.0);
        assert_eq!(cfg.delay.max_secs, 15.0);
        assert_eq!(cfg.timeout_secs, 20);
        assert_eq!(cfg.chunk_size, 8192);
        assert!(cfg.proxies.is_empty());
    }

    #[test]
    fn config_toml_partial_file_keeps_defaults() {
        let toml = r#"
            save_dir = "/srv/gazette"
        "#;
        let cfg: PdfpullConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.save_dir, PathBuf::from("/srv/gazette"));
        assert_eq!(cfg.delay, DelayConfig::default());
        assert_eq!(cfg.timeout_secs, 20);
    }

    #[test]
    fn config_toml_delay_and_proxies() {
        let toml = r#"
            timeout_secs = 45

            [delay]
            min_secs = 10
            max_secs = 30.5

            [proxies]
            http = "http://10.10.1.10:3128"
            https = "http://10.10.1.10:1080"
        "#;
        let cfg: PdfpullConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.timeout_secs, 45);
        assert_eq!(cfg.delay.min_secs, 10.0);
        assert_eq!(cfg.delay.max_secs, 30.5);
        assert_eq!(
            cfg.proxies.for_url("http://example.com/a.pdf"),
            Some("http://10.10.1.10:3128")
        );
        assert_eq!(
            cfg.proxies.for_url("https://example.com/a.pdf"),
            Some("http://10.10.1.10:1080")
        );
    }

    #[test]
    fn proxy_lookup_by_scheme_only() {
        let proxies: ProxyMap = [("HTTP".to_string(), "http://proxy:3128".to_string())]
            .into_iter()
            .collect();
        assert_eq!(
            proxies.for_url("http://example.com/x.pdf"),
            Some("http://proxy:3128")
        );
        assert_eq!(proxies.for_url("https://example.com/x.pdf"), None);
        assert_eq!(proxies.for_url("not a url"), None);
    }

    #[test]
    fn fetch_settings_rejects_inverted_delay() {
        let mut cfg = PdfpullConfig::default();
        cfg.delay = DelayConfig {
            min_secs: 9.0,
            max_secs: 3.0,
        };
        assert_eq!(
            cfg.fetch_settings().unwrap_err(),
            ConfigError::InvalidDelay { min: 9.0, max: 3.0 }
        );
    }

    #[test]
    fn fetch_settings_rejects_zero_chunk_and_timeout() {
        let mut cfg = PdfpullConfig::default();
        cfg.chunk_size = 0;
        assert_eq!(cfg.fetch_settings().unwrap_err(), ConfigError::ZeroChunkSize);
        let mut cfg = PdfpullConfig::default();
        cfg.timeout_secs = 0;
        assert_eq!(cfg.fetch_settings().unwrap_err(), ConfigError::ZeroTimeout);
    }

    #[test]
    fn fetch_settings_carries_values() {
        let settings = PdfpullConfig::default().fetch_settings().unwrap();
        assert_eq!(settings.save_dir, PathBuf::from("downloaded_pdfs"));
        assert_eq!(settings.timeout, Duration::from_secs(20));
        assert_eq!(settings.chunk_size, 8192);
        assert_eq!(settings.delay.min_secs(), 5.0);
        assert_eq!(settings.delay.max_secs(), 15.0);
    }

    #[test]
    fn load_from_path_reads_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "chunk_size = 4096").unwrap();
        f.flush().unwrap();
        let cfg = load_from_path(f.path()).unwrap();
        assert_eq!(cfg.chunk_size, 4096);
        assert_eq!(cfg.timeout_secs, 20);
    }

    #[test]
    fn load_from_path_reports_parse_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "chunk_size = \"big\"").unwrap();
        f.flush().unwrap();
        assert!(load_from_path(f.path()).is_err());
    }
}
