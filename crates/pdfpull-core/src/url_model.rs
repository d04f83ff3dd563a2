//! Destination naming: the saved file is the text after the URL's last `/`.

use std::path::{Path, PathBuf};

/// Final path segment of `url`, verbatim (query string included, no sanitization).
/// Empty when the URL ends in `/`.
pub fn destination_name(url: &str) -> &str {
    match url.rfind('/') {
        Some(idx) => &url[idx + 1..],
        None => url,
    }
}

/// Path the item is saved to. Also the existence-check key for skipping.
pub fn destination_path(save_dir: &Path, url: &str) -> PathBuf {
    save_dir.join(destination_name(url))
}

/// In-progress file, renamed onto the destination once the body is complete.
pub fn part_path(destination: &Path) -> PathBuf {
    let mut name = destination.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}
