//! Notification Center
//!
//! Holds at most one transient status banner. Each banner owns a one-shot
//! expiry timer; showing a new banner aborts the previous timer first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::event::{EventSender, WorkspaceEvent};

pub const DEFAULT_BANNER_TTL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Success => write!(f, "success"),
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Banner {
    pub message: String,
    pub severity: Severity,
    pub seq: u64,
    pub shown_at: DateTime<Utc>,
}

pub struct NotificationCenter {
    current: Option<Banner>,
    timer: Option<JoinHandle<()>>,
    next_seq: u64,
    ttl: Duration,
    events: EventSender,
}

impl NotificationCenter {
    pub fn new(events: EventSender, ttl: Duration) -> Self {
        Self {
            current: None,
            timer: None,
            next_seq: 0,
            ttl,
            events,
        }
    }

    pub fn current(&self) -> Option<&Banner> {
        self.current.as_ref()
    }

    /// Replace the banner and restart the expiry timer
    pub fn show(&mut self, message: impl Into<String>, severity: Severity) {
        self.cancel_timer();

        self.next_seq += 1;
        let seq = self.next_seq;
        let banner = Banner {
            message: message.into(),
            severity,
            seq,
            shown_at: Utc::now(),
        };
        info!(seq, %severity, "Banner: {}", banner.message);
        self.current = Some(banner);

        let events = self.events.clone();
        let ttl = self.ttl;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let _ = events.send(WorkspaceEvent::BannerExpired { seq });
        }));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.show(message, Severity::Success);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.show(message, Severity::Error);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.show(message, Severity::Warning);
    }

    pub fn clear(&mut self) {
        self.cancel_timer();
        self.current = None;
    }

    /// Expiry event from a banner timer. Ignored unless it belongs to
    /// the banner currently shown.
    pub fn on_expired(&mut self, seq: u64) {
        match &self.current {
            Some(banner) if banner.seq == seq => {
                self.timer = None;
                self.current = None;
            }
            _ => debug!(seq, "Ignoring expiry of a superseded banner"),
        }
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for NotificationCenter {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event;

    fn pump(center: &mut NotificationCenter, rx: &mut event::EventReceiver) {
        while let Ok(ev) = rx.try_recv() {
            if let WorkspaceEvent::BannerExpired { seq } = ev {
                center.on_expired(seq);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_banner_self_clears() {
        let (tx, mut rx) = event::channel();
        let mut center = NotificationCenter::new(tx, DEFAULT_BANNER_TTL);

        center.success("Valuation completed successfully!");
        assert_eq!(center.current().unwrap().severity, Severity::Success);

        tokio::time::sleep(Duration::from_millis(2999)).await;
        pump(&mut center, &mut rx);
        assert!(center.current().is_some());

        tokio::time::sleep(Duration::from_millis(2)).await;
        pump(&mut center, &mut rx);
        assert!(center.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_banner_outlives_older_timer() {
        let (tx, mut rx) = event::channel();
        let mut center = NotificationCenter::new(tx, DEFAULT_BANNER_TTL);

        center.error("first");
        tokio::time::sleep(Duration::from_millis(2000)).await;
        center.warning("second");

        // The first banner's deadline passes; the second must survive it.
        tokio::time::sleep(Duration::from_millis(1500)).await;
        pump(&mut center, &mut rx);
        let banner = center.current().unwrap();
        assert_eq!(banner.message, "second");
        assert_eq!(banner.severity, Severity::Warning);

        tokio::time::sleep(Duration::from_millis(1600)).await;
        pump(&mut center, &mut rx);
        assert!(center.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_cancels_timer() {
        let (tx, mut rx) = event::channel();
        let mut center = NotificationCenter::new(tx, DEFAULT_BANNER_TTL);

        center.success("done");
        center.clear();
        assert!(center.current().is_none());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_stale_expiry_is_ignored() {
        let (tx, _rx) = event::channel();
        let mut center = NotificationCenter::new(tx, DEFAULT_BANNER_TTL);
        center.on_expired(42);
        assert!(center.current().is_none());
    }
}
