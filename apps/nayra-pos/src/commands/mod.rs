//! # Commands Module
//!
//! Every screen action of the POS, callable from the CLI.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── session.rs    ◄─── login, logout, whoami, navigate      (/login)
//! ├── dashboard.rs  ◄─── today's totals, low stock            (/)
//! ├── product.rs    ◄─── list, add, remove, update            (/inventory)
//! ├── sale.rs       ◄─── record, list                         (/sales)
//! ├── report.rs     ◄─── generate, list, remove, export       (/reports)
//! ├── backup.rs     ◄─── backup, restore                      (/settings)
//! ├── settings.rs   ◄─── clear local data                     (/settings)
//! └── sync.rs       ◄─── status, reconcile                    (/)
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  async fn add_product(                                                  │
//! │      state: &AppState,          ◄── managers, config                   │
//! │      session: &SessionContext,  ◄── role checked against the route     │
//! │      form: ProductForm,         ◄── raw operator input                 │
//! │  ) -> Result<Outcome<ProductDto>, ApiError>                             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  value: what the screen shows; sync: synced / offline / queued / failed│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod backup;
pub mod dashboard;
pub mod product;
pub mod report;
pub mod sale;
pub mod session;
pub mod settings;
pub mod sync;

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use nayra_core::AccountTable;
    use nayra_db::{LocalCache, MemoryStore};
    use nayra_sync::{AppConfig, Connectivity, MemoryRemote, SyncAdapter, SyncContext};

    use crate::state::{AppState, SessionContext};

    pub struct Harness {
        pub state: AppState,
        pub remote: MemoryRemote,
    }

    pub fn harness(online: bool) -> Harness {
        let remote = MemoryRemote::new();
        let ctx = SyncContext::new(
            LocalCache::new(Arc::new(MemoryStore::new())),
            SyncAdapter::new(Arc::new(remote.clone())),
            Connectivity::new(online),
        );
        Harness {
            state: AppState::new(ctx, AppConfig::default()),
            remote,
        }
    }

    pub async fn admin(state: &AppState) -> SessionContext {
        login(state, "admin", "admin123").await
    }

    pub async fn employee(state: &AppState) -> SessionContext {
        login(state, "nayra", "nayra123").await
    }

    async fn login(state: &AppState, username: &str, password: &str) -> SessionContext {
        let mut session = SessionContext::restore(state.ctx().cache(), AccountTable::default())
            .await
            .unwrap();
        session.login(username, password).await.unwrap();
        session
    }
}
