//! # Application State
//!
//! Opens the local store, picks the remote backend and sets the initial
//! connectivity.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Open local store ─────────────────────────────────────────────────► │
//! │     • `[storage] database_path` or `<data dir>/nayra.db`                │
//! │     • SQLite with embedded migrations                                   │
//! │                                                                         │
//! │  2. Pick remote ──────────────────────────────────────────────────────► │
//! │     • rest:   `[remote] url` (none configured ⇒ always unreachable)     │
//! │     • memory: in-process store, for demos                               │
//! │                                                                         │
//! │  3. Initial connectivity ─────────────────────────────────────────────► │
//! │     • `--offline` / `start_offline` ⇒ offline, no remote call           │
//! │     • otherwise one probe ping                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use clap::ValueEnum;
use tracing::{info, warn};

use nayra_db::{Database, DbConfig, KeyValueStore, LocalCache};
use nayra_sync::{
    AppConfig, Connectivity, ConnectivityProbe, MemoryRemote, RemoteStore, RestClient,
    ReconcileReport, Reconciler, SyncAdapter, SyncContext,
};

use crate::error::{ApiError, ErrorCode};
use crate::state::SessionContext;

/// Which remote store backs the managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RemoteKind {
    /// PostgREST endpoint from `[remote] url`
    #[default]
    Rest,
    /// In-process store that lives as long as the command
    Memory,
}

#[derive(Debug, Clone, Default)]
pub struct StartupOptions {
    pub remote: RemoteKind,
    pub offline: bool,
}

#[derive(Debug, Clone)]
pub struct AppState {
    ctx: SyncContext,
    config: AppConfig,
}

impl AppState {
    pub fn new(ctx: SyncContext, config: AppConfig) -> Self {
        Self { ctx, config }
    }

    pub async fn open(config: AppConfig, options: &StartupOptions) -> Result<Self, ApiError> {
        let store = open_store(&config).await?;
        let remote = build_remote(&config, options.remote)?;

        let ctx = SyncContext::new(
            LocalCache::new(store),
            SyncAdapter::new(remote),
            Connectivity::new(false),
        );
        let state = Self::new(ctx, config);

        if options.offline || state.config.connectivity.start_offline {
            info!("Starting offline");
        } else {
            let online = state.probe().check_once().await;
            info!(online, "Initial connectivity");
        }

        Ok(state)
    }

    pub fn ctx(&self) -> &SyncContext {
        &self.ctx
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn probe(&self) -> ConnectivityProbe {
        ConnectivityProbe::new(
            self.ctx.adapter().clone(),
            self.ctx.connectivity().clone(),
            self.config.connectivity.probe_interval(),
        )
    }

    /// Start-up pass: pushes anything left over from an offline run.
    ///
    /// Does nothing while offline or when every collection is synced.
    pub async fn catch_up(&self) -> Result<Option<ReconcileReport>, ApiError> {
        if !self.ctx.is_online() {
            return Ok(None);
        }
        let report = Reconciler::new(self.ctx.clone()).reconcile_if_dirty().await?;
        if let Some(report) = &report {
            info!(replayed = report.records_replayed(), all_ok = report.all_ok(), "Start-up reconcile");
        }
        Ok(report)
    }

    /// Restores the operator session against the configured accounts.
    pub async fn session(&self) -> Result<SessionContext, ApiError> {
        SessionContext::restore(self.ctx.cache(), self.config.account_table()).await
    }
}

async fn open_store(config: &AppConfig) -> Result<Arc<dyn KeyValueStore>, ApiError> {
    let path = config.database_path().ok_or_else(|| {
        ApiError::new(ErrorCode::ConfigError, "Could not determine app data directory")
    })?;

    info!(?path, "Opening local store");
    let db = Database::new(DbConfig::new(path)).await?;
    Ok(Arc::new(db))
}

fn build_remote(config: &AppConfig, kind: RemoteKind) -> Result<Arc<dyn RemoteStore>, ApiError> {
    match kind {
        RemoteKind::Memory => Ok(Arc::new(MemoryRemote::new())),
        RemoteKind::Rest => match config.remote_url()? {
            Some(url) => {
                info!(%url, "Using remote store");
                let client = RestClient::new(
                    url,
                    config.remote.api_key.clone(),
                    config.remote.request_timeout(),
                )?;
                Ok(Arc::new(client))
            }
            None => {
                warn!("No remote URL configured; every remote call will fail");
                let unreachable = MemoryRemote::new();
                unreachable.set_failing(true);
                Ok(Arc::new(unreachable))
            }
        },
    }
}
