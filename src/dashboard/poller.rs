//! Periodic dashboard refresh.
//!
//! Fetches events and metrics on start, then on every tick or manual refresh
//! request. A failed fetch leaves the previous summary in place; there is no
//! retry or backoff beyond the next tick.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::client::ReportingClient;
use super::summary::DashboardSummary;
use crate::error::Result;

/// Poller configuration
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Time between refreshes
    pub interval: Duration,
    /// Events fetched per refresh
    pub event_limit: usize,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            event_limit: 50,
        }
    }
}

/// Dashboard poller
pub struct DashboardPoller {
    client: ReportingClient,
    config: PollerConfig,
    latest_tx: watch::Sender<Option<Arc<DashboardSummary>>>,
}

impl DashboardPoller {
    /// Create a poller; nothing is fetched until [`refresh`](Self::refresh) or [`spawn`](Self::spawn).
    pub fn new(client: ReportingClient, config: PollerConfig) -> Self {
        let (latest_tx, _) = watch::channel(None);
        Self {
            client,
            config,
            latest_tx,
        }
    }

    /// Receiver notified after every successful refresh.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<DashboardSummary>>> {
        self.latest_tx.subscribe()
    }

    /// Most recent successful summary.
    pub fn latest(&self) -> Option<Arc<DashboardSummary>> {
        self.latest_tx.borrow().clone()
    }

    /// Fetch once and publish the result.
    ///
    /// On failure the previously published summary is kept.
    pub async fn refresh(&self) -> Result<Arc<DashboardSummary>> {
        let (events, metrics) = tokio::try_join!(
            self.client.events(self.config.event_limit),
            self.client.metrics()
        )?;

        let summary = Arc::new(DashboardSummary::compute(events, metrics));
        self.latest_tx.send_replace(Some(summary.clone()));
        Ok(summary)
    }

    /// Run the poll loop on the current runtime.
    pub fn spawn(self: Arc<Self>) -> PollerHandle {
        let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);
        let refresh = Arc::new(Notify::new());
        let manual = refresh.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.config.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => break,
                    _ = ticker.tick() => {},
                    () = manual.notified() => {},
                }

                if let Err(e) = self.refresh().await {
                    tracing::warn!(
                        server = self.client.base_url(),
                        "dashboard refresh failed, keeping previous data: {}",
                        e
                    );
                }
            }

            tracing::debug!("dashboard poller stopped");
        });

        PollerHandle {
            shutdown_tx,
            refresh,
            task,
        }
    }
}

/// Handle to a running poll loop
pub struct PollerHandle {
    shutdown_tx: broadcast::Sender<()>,
    refresh: Arc<Notify>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Refresh now, without waiting for the next tick.
    pub fn refresh_now(&self) {
        self.refresh.notify_one();
    }

    /// Stop polling and wait for the loop to exit.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.task.await;
    }

    /// Whether the loop has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_poller() -> DashboardPoller {
        let client = ReportingClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        DashboardPoller::new(
            client,
            PollerConfig {
                interval: Duration::from_millis(20),
                event_limit: 50,
            },
        )
    }

    #[test]
    fn test_default_config() {
        let config = PollerConfig::default();
        assert_eq!(config.interval, Duration::from_secs(5));
        assert_eq!(config.event_limit, 50);
    }

    #[tokio::test]
    async fn test_failed_refresh_publishes_nothing() {
        let poller = unreachable_poller();
        assert!(poller.refresh().await.is_err());
        assert!(poller.latest().is_none());
    }

    #[tokio::test]
    async fn test_stop_ends_loop() {
        let poller = Arc::new(unreachable_poller());
        let handle = poller.clone().spawn();

        handle.refresh_now();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!handle.is_finished());

        handle.stop().await;
        assert!(poller.latest().is_none());
    }
}
