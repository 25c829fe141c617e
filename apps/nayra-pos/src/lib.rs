//! # Nayra POS Library
//!
//! Everything behind the `nayra-pos` binary: state, commands, export.
//!
//! ## Module Organization
//! ```text
//! nayra_pos/
//! ├── lib.rs          ◄─── You are here (tracing setup)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── app.rs      ◄─── AppState: store, remote, connectivity
//! │   ├── session.rs  ◄─── SessionContext: role + route guard
//! │   └── events.rs   ◄─── EventPrinter for `watch`
//! ├── commands/       ◄─── One module per screen
//! ├── export.rs       ◄─── Daily summary → .xlsx
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Output Channels
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stdout ◄── command results as JSON (scriptable)                        │
//! │  stderr ◄── tracing logs (RUST_LOG) and errors                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod export;
pub mod state;

pub use error::{ApiError, ErrorCode};
pub use state::{AppState, RemoteKind, SessionContext, StartupOptions};

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=nayra_sync=trace` - Show trace for one crate only
/// - Default: `info,nayra=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,nayra=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
