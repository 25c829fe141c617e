//! # Connectivity Signal
//!
//! The process-wide online/offline flag. Writers are the probe and the
//! host (`--offline`); readers are the managers and the monitor.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Connectivity {
    tx: Arc<watch::Sender<bool>>,
}

impl Connectivity {
    pub fn new(online: bool) -> Self {
        let (tx, _rx) = watch::channel(online);
        Self { tx: Arc::new(tx) }
    }

    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    /// Sets the flag. Subscribers are only woken on an actual change.
    pub fn set_online(&self, online: bool) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
        if changed {
            info!(online, "Connectivity changed");
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_only_changes_wake_subscribers() {
        let connectivity = Connectivity::new(true);
        let mut rx = connectivity.subscribe();

        connectivity.set_online(true);
        assert!(!rx.has_changed().unwrap());

        connectivity.set_online(false);
        assert!(rx.has_changed().unwrap());
        assert!(!*rx.borrow_and_update());
        assert!(!connectivity.is_online());
    }
}
