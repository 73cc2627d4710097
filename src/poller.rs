//! Dev-mode poller.
//! Watches the configuration's modification metadata and requests a reload
//! when a previously recorded stamp changes. Best-effort only: every poll
//! error is swallowed so the preview is never disrupted by a flaky check.

use std::time::Duration;

use reqwest::Client;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::loader::{self, ConfigSource};

/// Interval between metadata checks.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Poll state. `last_modified` starts unknown; the first observation only
/// records a baseline and never triggers a reload.
pub struct Poller {
    source: ConfigSource,
    client: Client,
    last_modified: Option<String>,
}

impl Poller {
    pub fn new(source: ConfigSource, client: Client) -> Self {
        Self {
            source,
            client,
            last_modified: None,
        }
    }

    /// Runs the poll loop until the reload channel closes.
    pub async fn run(mut self, reload: UnboundedSender<()>) {
        let mut ticker = tokio::time::interval(POLL_INTERVAL);
        loop {
            ticker.tick().await;
            if self.check().await && reload.send(()).is_err() {
                return;
            }
        }
    }

    /// One poll tick: true when a recorded stamp changed.
    async fn check(&mut self) -> bool {
        match loader::modified(&self.client, &self.source).await {
            Ok(stamp) => self.observe(stamp),
            Err(err) => {
                // Ignore errors in development mode
                debug!("Config poll failed: {err:#}");
                false
            }
        }
    }

    /// Records one observation and reports whether a previously recorded
    /// stamp changed. An unknown baseline never reports a change.
    fn observe(&mut self, stamp: Option<String>) -> bool {
        let changed = self.last_modified.is_some() && stamp != self.last_modified;
        self.last_modified = stamp;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poller() -> Poller {
        Poller::new(ConfigSource::parse("links.json"), Client::new())
    }

    #[test]
    fn test_first_observation_records_without_reload() {
        let mut p = poller();
        assert!(!p.observe(Some("stamp-1".to_string())));
    }

    #[test]
    fn test_unchanged_stamp_does_not_reload() {
        let mut p = poller();
        p.observe(Some("stamp-1".to_string()));
        assert!(!p.observe(Some("stamp-1".to_string())));
    }

    #[test]
    fn test_changed_stamp_reloads() {
        let mut p = poller();
        p.observe(Some("stamp-1".to_string()));
        assert!(p.observe(Some("stamp-2".to_string())));
    }

    #[test]
    fn test_stamp_missing_before_baseline_never_reloads() {
        // Sources without a usable stamp keep the baseline unknown forever
        let mut p = poller();
        assert!(!p.observe(None));
        assert!(!p.observe(None));
        assert!(!p.observe(Some("stamp-1".to_string())));
        assert!(!p.observe(Some("stamp-1".to_string())));
    }

    #[test]
    fn test_stamp_disappearing_after_baseline_reloads() {
        let mut p = poller();
        p.observe(Some("stamp-1".to_string()));
        assert!(p.observe(None));
    }
}
