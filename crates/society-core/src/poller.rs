// ── Alert badge poller ──
//
// One background task per poller fetches `GET /alerts/active` right away
// and then on every interval tick, publishing badge counts on a watch
// channel. The poller owns the task: `stop()` or drop cancels it.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use society_api::ApiClient;
use society_api::types::{Alert, AlertPriority, AlertStatus};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Counts behind the navigation badge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertCounts {
    pub active: usize,
    pub critical: usize,
    pub high: usize,
    pub escalated: usize,
    /// `None` until the first successful fetch.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl AlertCounts {
    pub fn from_alerts(alerts: &[Alert], fetched_at: DateTime<Utc>) -> Self {
        let active: Vec<&Alert> = alerts
            .iter()
            .filter(|a| a.status == AlertStatus::Active)
            .collect();
        Self {
            active: active.len(),
            critical: active
                .iter()
                .filter(|a| a.priority == AlertPriority::Critical)
                .count(),
            high: active
                .iter()
                .filter(|a| a.priority == AlertPriority::High)
                .count(),
            escalated: active.iter().filter(|a| a.is_escalated()).count(),
            fetched_at: Some(fetched_at),
        }
    }
}

pub struct AlertBadgePoller {
    counts: watch::Receiver<AlertCounts>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl AlertBadgePoller {
    /// Start polling. Must be called inside a tokio runtime.
    pub fn spawn(client: Arc<ApiClient>, interval: Duration) -> Self {
        let (tx, counts) = watch::channel(AlertCounts::default());
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(poll_task(
            client,
            interval.max(MIN_INTERVAL),
            tx,
            cancel.clone(),
        ));
        Self {
            counts,
            cancel,
            handle: Some(handle),
        }
    }

    /// Latest published counts.
    pub fn current(&self) -> AlertCounts {
        *self.counts.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<AlertCounts> {
        self.counts.clone()
    }

    /// Counts as a stream, starting with the current value.
    pub fn stream(&self) -> WatchStream<AlertCounts> {
        WatchStream::new(self.counts.clone())
    }

    /// Cancel the task and wait for it to finish.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for AlertBadgePoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_task(
    client: Arc<ApiClient>,
    interval: Duration,
    tx: watch::Sender<AlertCounts>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                match client.active_alerts().await {
                    Ok(alerts) => {
                        let counts = AlertCounts::from_alerts(&alerts, Utc::now());
                        debug!(
                            active = counts.active,
                            critical = counts.critical,
                            "alert counts refreshed"
                        );
                        tx.send_replace(counts);
                    }
                    Err(e) => warn!(error = %e, "alert poll failed; keeping previous counts"),
                }
            }
        }
    }
    debug!("alert poller stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::tests::alert;

    #[test]
    fn counts_only_active_alerts() {
        let mut critical = alert(AlertStatus::Active, "u1");
        critical.priority = AlertPriority::Critical;
        let high = alert(AlertStatus::Active, "u1");
        let resolved = alert(AlertStatus::Resolved, "u1");

        let now = Utc::now();
        let counts = AlertCounts::from_alerts(&[critical, high, resolved], now);
        assert_eq!(counts.active, 2);
        assert_eq!(counts.critical, 1);
        assert_eq!(counts.high, 1);
        assert_eq!(counts.escalated, 0);
        assert_eq!(counts.fetched_at, Some(now));
    }
}
