//! Periodic refresh of index statistics

use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use super::status::{RequestStatus, Sequencer};
use crate::api::{ApiError, StatsSnapshot};

/// State of the stats stream.
///
/// A failed refresh never blanks a snapshot that was already shown. A slow
/// response is still applied when a later tick is in flight, as long as
/// nothing newer has landed first.
#[derive(Debug, Default)]
pub struct StatsPoller {
    sequencer: Sequencer,
    /// Highest sequence number applied so far
    applied: u64,
    status: RequestStatus,
    snapshot: Option<StatsSnapshot>,
    fetched_at: Option<DateTime<Local>>,
}

impl StatsPoller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a refresh; returns the sequence number to complete it with
    pub fn request(&mut self) -> u64 {
        self.status = RequestStatus::Loading;
        self.sequencer.next()
    }

    pub fn complete(
        &mut self,
        seq: u64,
        result: Result<StatsSnapshot, ApiError>,
        now: DateTime<Local>,
    ) {
        if seq <= self.applied {
            debug!(seq, applied = self.applied, "Dropping stale stats response");
            return;
        }
        self.applied = seq;
        // An older answer fills the panel but the newest request stays pending
        let latest = self.sequencer.is_current(seq);

        match result {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                self.fetched_at = Some(now);
                if latest {
                    self.status = RequestStatus::Success;
                }
            }
            Err(err) => {
                warn!("Failed to load stats: {err}");
                if latest {
                    self.status = RequestStatus::Failed(err.user_message("load stats"));
                }
            }
        }
    }

    pub fn snapshot(&self) -> Option<&StatsSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn fetched_at(&self) -> Option<DateTime<Local>> {
        self.fetched_at
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    /// Error worth showing: only when nothing was ever loaded
    pub fn visible_error(&self) -> Option<&str> {
        match self.snapshot {
            Some(_) => None,
            None => self.status.error(),
        }
    }
}

/// Owns the polling task. Dropping the handle stops polling.
#[derive(Debug)]
pub struct PollerHandle {
    task: JoinHandle<()>,
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Send a tick right away and then every `interval` until the handle is
/// dropped or the receiver goes away.
pub fn spawn_poller<E, F>(interval: Duration, tx: async_channel::Sender<E>, tick: F) -> PollerHandle
where
    E: Send + 'static,
    F: Fn() -> E + Send + 'static,
{
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if tx.send(tick()).await.is_err() {
                break;
            }
        }
    });
    PollerHandle { task }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(total: u64) -> StatsSnapshot {
        StatsSnapshot {
            total_documents_indexed: total,
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_failure_keeps_last_snapshot() {
        let mut poller = StatsPoller::new();
        let seq = poller.request();
        poller.complete(seq, Ok(snapshot(42)), Local::now());

        let seq = poller.request();
        poller.complete(seq, Err(ApiError::Timeout), Local::now());

        assert_eq!(poller.snapshot().map(|s| s.total_documents_indexed), Some(42));
        assert!(poller.visible_error().is_none());
    }

    #[test]
    fn test_error_shown_without_any_snapshot() {
        let mut poller = StatsPoller::new();
        let seq = poller.request();
        poller.complete(seq, Err(ApiError::Timeout), Local::now());

        assert!(poller.snapshot().is_none());
        assert_eq!(
            poller.visible_error(),
            Some("Failed to load stats. Is the backend running?")
        );
    }

    #[test]
    fn test_stale_stats_dropped() {
        let mut poller = StatsPoller::new();
        let old = poller.request();
        let new = poller.request();
        poller.complete(new, Ok(snapshot(10)), Local::now());
        poller.complete(old, Ok(snapshot(5)), Local::now());
        assert_eq!(poller.snapshot().map(|s| s.total_documents_indexed), Some(10));
    }

    #[test]
    fn test_slow_response_applied_while_next_tick_pending() {
        let mut poller = StatsPoller::new();
        let first = poller.request();
        let second = poller.request();

        poller.complete(first, Ok(snapshot(7)), Local::now());
        assert_eq!(poller.snapshot().map(|s| s.total_documents_indexed), Some(7));
        assert!(poller.is_loading());

        poller.complete(second, Ok(snapshot(9)), Local::now());
        assert_eq!(poller.snapshot().map(|s| s.total_documents_indexed), Some(9));
        assert!(!poller.is_loading());
    }

    #[test]
    fn test_older_failure_does_not_end_pending_refresh() {
        let mut poller = StatsPoller::new();
        let first = poller.request();
        let _second = poller.request();

        poller.complete(first, Err(ApiError::Timeout), Local::now());
        assert!(poller.is_loading());
        assert!(poller.visible_error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_ticks_immediately_then_on_interval() {
        let (tx, rx) = async_channel::unbounded();
        let handle = spawn_poller(Duration::from_secs(30), tx, || ());

        rx.recv().await.unwrap();
        let start = tokio::time::Instant::now();
        rx.recv().await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(30));

        drop(handle);
        tokio::time::sleep(Duration::from_secs(90)).await;
        assert!(rx.try_recv().is_err());
    }
}
