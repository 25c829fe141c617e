//! # Sync Event Printer
//!
//! `SyncEventEmitter` for the `watch` command: every event becomes one JSON
//! line on the given writer.
//!
//! ```text
//! {"event":"sync:online"}
//! {"event":"sync:reconciled","report":{"collections":[...]}}
//! {"event":"sync:offline"}
//! {"event":"sync:error","message":"..."}
//! ```

use std::io::Write;
use std::sync::Mutex;

use serde::Serialize;
use tracing::{debug, error};

use nayra_sync::{ReconcileReport, SyncEventEmitter};

#[derive(Serialize)]
#[serde(tag = "event")]
enum SyncEvent<'a> {
    #[serde(rename = "sync:online")]
    Online,
    #[serde(rename = "sync:offline")]
    Offline,
    #[serde(rename = "sync:reconciled")]
    Reconciled { report: &'a ReconcileReport },
    #[serde(rename = "sync:error")]
    Error { message: &'a str },
}

pub struct EventPrinter<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> EventPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn print(&self, event: &SyncEvent<'_>) {
        let line = match serde_json::to_string(event) {
            Ok(line) => line,
            Err(e) => {
                error!(?e, "Failed to encode sync event");
                return;
            }
        };

        let Ok(mut out) = self.out.lock() else {
            return;
        };
        if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            error!(?e, "Failed to write sync event");
        }
        debug!(%line, "Emitted sync event");
    }
}

impl<W: Write + Send> SyncEventEmitter for EventPrinter<W> {
    fn emit_online(&self) {
        self.print(&SyncEvent::Online);
    }

    fn emit_offline(&self) {
        self.print(&SyncEvent::Offline);
    }

    fn emit_reconciled(&self, report: &ReconcileReport) {
        self.print(&SyncEvent::Reconciled { report });
    }

    fn emit_error(&self, message: &str) {
        self.print(&SyncEvent::Error { message });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_json_line_per_event() {
        let printer = EventPrinter::new(Vec::new());
        printer.emit_online();
        printer.emit_reconciled(&ReconcileReport::default());
        printer.emit_error("remote down");

        let text = String::from_utf8(printer.into_inner()).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["event"], "sync:online");
        assert_eq!(lines[1]["event"], "sync:reconciled");
        assert_eq!(lines[1]["report"]["collections"], serde_json::json!([]));
        assert_eq!(lines[2]["message"], "remote down");
    }
}
