//! Configuration retrieval.
//! Loads links.json from a local path or an HTTP URL, parses it, and exposes
//! the modification metadata the dev poller compares between ticks.
//! No retry and no timeout: a failed load is surfaced once by the caller and
//! a hung retrieval hangs only that load.

use std::path::PathBuf;
use std::time::UNIX_EPOCH;

use anyhow::{Context, Result, bail};
use reqwest::Client;

use crate::config::LinksConfig;

/// Relative path used when no --config argument is given.
pub const DEFAULT_CONFIG: &str = "links.json";

/// Where the configuration document lives.
#[derive(Clone, Debug)]
pub enum ConfigSource {
    /// Local file, read from disk.
    File(PathBuf),
    /// HTTP(S) resource, fetched with reqwest.
    Remote(String),
}

impl ConfigSource {
    /// Classifies the CLI value: anything with an http(s) scheme is remote,
    /// everything else is a filesystem path.
    pub fn parse(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            ConfigSource::Remote(value.to_string())
        } else {
            ConfigSource::File(PathBuf::from(value))
        }
    }

    /// True when the source is served from a development host. Local files
    /// always count; URLs only when the host is a loopback name.
    pub fn is_dev(&self) -> bool {
        match self {
            ConfigSource::File(_) => true,
            ConfigSource::Remote(url) => reqwest::Url::parse(url)
                .ok()
                .and_then(|u| u.host_str().map(is_loopback_host))
                .unwrap_or(false),
        }
    }
}

fn is_loopback_host(host: &str) -> bool {
    matches!(host, "localhost" | "127.0.0.1" | "::1" | "[::1]")
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Remote(url) => write!(f, "{url}"),
        }
    }
}

/// Retrieves and parses the configuration. A non-success status or an
/// unreadable file surfaces as a retrieval error, invalid JSON as a parse
/// error; the caller folds both into the single failed-load outcome.
pub async fn load(client: &Client, source: &ConfigSource) -> Result<LinksConfig> {
    let body = match source {
        ConfigSource::File(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        ConfigSource::Remote(url) => {
            let response = client
                .get(url)
                .send()
                .await
                .with_context(|| format!("Failed to fetch {url}"))?;
            if !response.status().is_success() {
                bail!("Failed to load links configuration: {url} returned {}", response.status());
            }
            response
                .text()
                .await
                .context("Failed to read configuration body")?
        }
    };
    serde_json::from_str(&body).context("Links configuration is not valid JSON")
}

/// Retrieves modification metadata only: the Last-Modified header for a
/// remote source, the filesystem mtime for a local one. `None` means the
/// source carries no usable stamp.
pub async fn modified(client: &Client, source: &ConfigSource) -> Result<Option<String>> {
    match source {
        ConfigSource::File(path) => {
            let metadata = std::fs::metadata(path)
                .with_context(|| format!("Failed to stat {}", path.display()))?;
            let mtime = metadata
                .modified()
                .context("Filesystem does not report modification times")?;
            let stamp = mtime.duration_since(UNIX_EPOCH).unwrap_or_default();
            Ok(Some(format!("{}.{:09}", stamp.as_secs(), stamp.subsec_nanos())))
        }
        ConfigSource::Remote(url) => {
            let response = client
                .head(url)
                .send()
                .await
                .with_context(|| format!("Failed to probe {url}"))?;
            Ok(response
                .headers()
                .get(reqwest::header::LAST_MODIFIED)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("linkdeck-{}-{name}", std::process::id()));
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_parse_classifies_urls_and_paths() {
        assert!(matches!(ConfigSource::parse("links.json"), ConfigSource::File(_)));
        assert!(matches!(ConfigSource::parse("/srv/www/links.json"), ConfigSource::File(_)));
        assert!(matches!(
            ConfigSource::parse("https://example.com/links.json"),
            ConfigSource::Remote(_)
        ));
        assert!(matches!(
            ConfigSource::parse("http://localhost:8080/links.json"),
            ConfigSource::Remote(_)
        ));
    }

    #[test]
    fn test_is_dev_for_local_files() {
        assert!(ConfigSource::parse("links.json").is_dev());
    }

    #[test]
    fn test_is_dev_for_loopback_hosts_only() {
        assert!(ConfigSource::parse("http://localhost:8080/links.json").is_dev());
        assert!(ConfigSource::parse("http://127.0.0.1/links.json").is_dev());
        assert!(ConfigSource::parse("http://[::1]:3000/links.json").is_dev());
        assert!(!ConfigSource::parse("https://example.com/links.json").is_dev());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let path = temp_config("load.json", r#"{"profile": {"name": "Ada"}, "links": []}"#);
        let config = load(&Client::new(), &ConfigSource::File(path.clone())).await.unwrap();
        assert_eq!(config.profile.display_name(), "Ada");
        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_load_missing_file_is_retrieval_error() {
        let source = ConfigSource::File(PathBuf::from("/nonexistent/links.json"));
        let err = load(&Client::new(), &source).await.unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[tokio::test]
    async fn test_load_invalid_json_is_parse_error() {
        let path = temp_config("invalid.json", "not json at all");
        let err = load(&Client::new(), &ConfigSource::File(path.clone())).await.unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_modified_reports_file_mtime() {
        let path = temp_config("mtime.json", "{}");
        let stamp = modified(&Client::new(), &ConfigSource::File(path.clone())).await.unwrap();
        assert!(stamp.is_some());
        std::fs::remove_file(path).unwrap();
    }
}
