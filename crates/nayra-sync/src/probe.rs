//! # Connectivity Probe
//!
//! Feeds the connectivity signal by pinging the remote store on a fixed
//! interval. The first check happens immediately.
//!
//! A ping that has not answered within `min(interval, 5s)` counts as
//! offline, so a server that accepts connections and then stalls cannot
//! hold up start-up or shutdown.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::adapter::SyncAdapter;
use crate::connectivity::Connectivity;
use crate::error::{SyncError, SyncResult};

/// Upper bound on a single ping.
pub const PING_TIMEOUT: Duration = Duration::from_secs(5);

pub struct ConnectivityProbe {
    adapter: SyncAdapter,
    connectivity: Connectivity,
    interval: Duration,
    ping_timeout: Duration,
}

/// Handle for stopping a running probe.
pub struct ProbeHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl ProbeHandle {
    pub async fn shutdown(self) -> SyncResult<()> {
        self.shutdown_tx
            .send(())
            .await
            .map_err(|_| SyncError::ChannelError("Probe shutdown channel closed".into()))?;
        self.task
            .await
            .map_err(|e| SyncError::Internal(format!("Probe task failed: {}", e)))
    }
}

impl ConnectivityProbe {
    pub fn new(adapter: SyncAdapter, connectivity: Connectivity, interval: Duration) -> Self {
        Self {
            adapter,
            connectivity,
            interval,
            ping_timeout: interval.min(PING_TIMEOUT),
        }
    }

    /// Pings once and updates the signal. Returns the new state.
    pub async fn check_once(&self) -> bool {
        let online = match tokio::time::timeout(self.ping_timeout, self.adapter.ping()).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                debug!(error = %e, "Remote ping failed");
                false
            }
            Err(_) => {
                debug!(timeout_ms = self.ping_timeout.as_millis() as u64, "Remote ping timed out");
                false
            }
        };
        self.connectivity.set_online(online);
        online
    }

    pub fn spawn(self) -> ProbeHandle {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let task = tokio::spawn(self.run(shutdown_rx));
        ProbeHandle { shutdown_tx, task }
    }

    async fn run(self, mut shutdown_rx: mpsc::Receiver<()>) {
        info!(interval_secs = self.interval.as_secs(), "Connectivity probe starting");

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.check_once().await;
                }

                _ = shutdown_rx.recv() => {
                    info!("Connectivity probe shutting down");
                    break;
                }
            }
        }
    }
}
