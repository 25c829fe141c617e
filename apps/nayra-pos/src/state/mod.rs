//! # State Module
//!
//! Long-lived state shared by the commands of one invocation.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────┐  ┌──────────────────────────────────┐    │
//! │  │        AppState          │  │        SessionContext            │    │
//! │  │                          │  │                                  │    │
//! │  │  SyncContext (managers,  │  │  role: Option<Role>              │    │
//! │  │   cache, connectivity)   │  │  accounts: AccountTable          │    │
//! │  │  AppConfig               │  │  persisted under `userRole`      │    │
//! │  └──────────────────────────┘  └──────────────────────────────────┘    │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  EventPrinter: SyncEventEmitter writing JSON lines (`watch`)     │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • AppState: SyncContext serializes each collection internally         │
//! │  • SessionContext: mutated only by login/logout (`&mut self`)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod app;
mod events;
mod session;

pub use app::{AppState, RemoteKind, StartupOptions};
pub use events::EventPrinter;
pub use session::SessionContext;
