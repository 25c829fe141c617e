//! # Connectivity Monitor
//!
//! Watches the connectivity signal and reacts to transitions.
//!
//! ```text
//!   offline ──► online    emit_online, one Reconciler pass, emit_reconciled
//!   online  ──► offline   emit_offline
//! ```
//!
//! The state at spawn time is not a transition; the host runs its own
//! start-up pass (`Reconciler::reconcile_if_dirty`).

use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::error::{SyncError, SyncResult};
use crate::manager::SyncContext;
use crate::outbox::{ReconcileReport, Reconciler};

// =============================================================================
// Event Emitter Trait
// =============================================================================

/// Receives sync events for display (status line, notifications).
pub trait SyncEventEmitter: Send + Sync {
    fn emit_online(&self);

    fn emit_offline(&self);

    fn emit_reconciled(&self, report: &ReconcileReport);

    fn emit_error(&self, message: &str);
}

/// No-op event emitter for testing.
pub struct NoOpEmitter;

impl SyncEventEmitter for NoOpEmitter {
    fn emit_online(&self) {}
    fn emit_offline(&self) {}
    fn emit_reconciled(&self, _report: &ReconcileReport) {}
    fn emit_error(&self, _message: &str) {}
}

// =============================================================================
// Monitor
// =============================================================================

pub struct ConnectivityMonitor {
    ctx: SyncContext,
    emitter: Arc<dyn SyncEventEmitter>,
}

/// Handle for stopping a running monitor.
pub struct MonitorHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Stops the monitor and waits for an in-flight pass to finish.
    pub async fn shutdown(self) -> SyncResult<()> {
        self.shutdown_tx
            .send(())
            .await
            .map_err(|_| SyncError::ChannelError("Monitor shutdown channel closed".into()))?;
        self.task
            .await
            .map_err(|e| SyncError::Internal(format!("Monitor task failed: {}", e)))
    }
}

impl ConnectivityMonitor {
    pub fn new(ctx: SyncContext, emitter: Arc<dyn SyncEventEmitter>) -> Self {
        Self { ctx, emitter }
    }

    pub fn spawn(self) -> MonitorHandle {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let mut rx = self.ctx.connectivity().subscribe();
        let initial = *rx.borrow_and_update();
        let task = tokio::spawn(self.run(rx, initial, shutdown_rx));
        MonitorHandle { shutdown_tx, task }
    }

    async fn run(
        self,
        mut rx: watch::Receiver<bool>,
        mut last: bool,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        let reconciler = Reconciler::new(self.ctx.clone());
        info!(online = last, "Connectivity monitor started");

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Connectivity monitor shutting down");
                    break;
                }

                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let online = *rx.borrow_and_update();
                    if online == last {
                        continue;
                    }
                    last = online;

                    if online {
                        self.emitter.emit_online();
                        match reconciler.reconcile().await {
                            Ok(report) => self.emitter.emit_reconciled(&report),
                            Err(e) => {
                                error!(error = %e, "Reconcile failed");
                                self.emitter.emit_error(&e.to_string());
                            }
                        }
                    } else {
                        self.emitter.emit_offline();
                    }
                }
            }
        }

        info!("Connectivity monitor stopped");
    }
}
