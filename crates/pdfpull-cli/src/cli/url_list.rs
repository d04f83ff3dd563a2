//! URL list files: one URL per line, order preserved, no deduplication.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn read_url_list(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read URL list {}", path.display()))?;
    Ok(parse_url_list(&text))
}

/// Skips blank lines and `#` comments. Lines that are not absolute URLs are kept
/// (the batch reports them as failed) but logged.
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            if let Err(e) = url::Url::parse(line) {
                tracing::warn!(line = i + 1, "not an absolute URL ({}): {}", e, line);
            }
            Some(line.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn skips_blanks_and_comments_keeps_order_and_duplicates() {
        let text = "\
# gazette issues
https://x.test/b.pdf

  https://x.test/a.pdf  
https://x.test/b.pdf
";
        assert_eq!(
            parse_url_list(text),
            vec![
                "https://x.test/b.pdf",
                "https://x.test/a.pdf",
                "https://x.test/b.pdf"
            ]
        );
    }

    #[test]
    fn keeps_unparseable_lines() {
        assert_eq!(parse_url_list("not a url\n"), vec!["not a url"]);
    }

    #[test]
    fn reads_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "https://x.test/one.pdf").unwrap();
        writeln!(f, "# skip").unwrap();
        writeln!(f, "https://x.test/two.pdf").unwrap();
        f.flush().unwrap();
        assert_eq!(
            read_url_list(f.path()).unwrap(),
            vec!["https://x.test/one.pdf", "https://x.test/two.pdf"]
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_url_list(&dir.path().join("nope.txt")).is_err());
    }
}
