//! # Application Configuration
//!
//! Where the local store lives, which remote store to talk to, and how
//! connectivity is detected.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     NAYRA_REMOTE_URL=https://xyz.supabase.co                           │
//! │     NAYRA_START_OFFLINE=true                                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/nayra-pos/nayra.toml (Linux)                             │
//! │     ~/Library/Application Support/com.nayra.pos/nayra.toml (macOS)     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     no remote, probe every 30s, two built-in accounts                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # nayra.toml
//! [storage]
//! database_path = "/var/lib/nayra/nayra.db"
//!
//! [remote]
//! url = "https://xyz.supabase.co"
//! api_key = "public-anon-key"
//! request_timeout_secs = 10
//!
//! [connectivity]
//! probe_interval_secs = 30
//! start_offline = false
//!
//! [[accounts]]
//! username = "admin"
//! password = "admin123"
//! role = "admin"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use nayra_core::{Account, AccountTable, Role};

use crate::error::{SyncError, SyncResult};

// =============================================================================
// Storage Settings
// =============================================================================

/// Local storage settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite file; `None` uses the platform data directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

// =============================================================================
// Remote Settings
// =============================================================================

/// Hosted store settings. Without a URL the app runs purely local.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSettings {
    /// Base URL of the PostgREST endpoint (the `/rest/v1` prefix is added).
    #[serde(default)]
    pub url: Option<String>,

    /// Sent as both `apikey` and bearer token.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-request timeout. Unset means no timeout.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl RemoteSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

// =============================================================================
// Connectivity Settings
// =============================================================================

/// How the online/offline signal is fed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivitySettings {
    /// Seconds between remote health checks.
    #[serde(default = "default_probe_interval")]
    pub probe_interval_secs: u64,

    /// Start with the signal forced offline.
    #[serde(default)]
    pub start_offline: bool,
}

fn default_probe_interval() -> u64 {
    30
}

impl Default for ConnectivitySettings {
    fn default() -> Self {
        Self {
            probe_interval_secs: default_probe_interval(),
            start_offline: false,
        }
    }
}

impl ConnectivitySettings {
    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs)
    }
}

fn default_accounts() -> Vec<Account> {
    vec![
        Account::new("admin", "admin123", Role::Admin),
        Account::new("nayra", "nayra123", Role::Employee),
    ]
}

// =============================================================================
// App Config
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub remote: RemoteSettings,

    #[serde(default)]
    pub connectivity: ConnectivitySettings,

    #[serde(default = "default_accounts")]
    pub accounts: Vec<Account>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageSettings::default(),
            remote: RemoteSettings::default(),
            connectivity: ConnectivitySettings::default(),
            accounts: default_accounts(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from file (if present) and environment, then validates.
    pub fn load(config_path: Option<PathBuf>) -> SyncResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> SyncResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SyncError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SyncError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| SyncError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SyncResult<()> {
        if let Some(url) = self.remote_url()? {
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(SyncError::InvalidUrl(format!(
                    "Remote URL must use http or https, got: {}",
                    url
                )));
            }
        }

        if self.remote.request_timeout_secs == Some(0) {
            return Err(SyncError::InvalidConfig(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.connectivity.probe_interval_secs == 0 {
            return Err(SyncError::InvalidConfig(
                "probe_interval_secs must be greater than 0".into(),
            ));
        }

        if self.accounts.is_empty() {
            return Err(SyncError::InvalidConfig("at least one account is required".into()));
        }

        Ok(())
    }

    /// Applies `NAYRA_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("NAYRA_DATABASE_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Some(url) = lookup("NAYRA_REMOTE_URL") {
            debug!(url = %url, "Overriding remote URL from environment");
            self.remote.url = Some(url);
        }

        if let Some(key) = lookup("NAYRA_REMOTE_API_KEY") {
            self.remote.api_key = Some(key);
        }

        if let Some(secs) = lookup("NAYRA_REQUEST_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.remote.request_timeout_secs = Some(s),
                Err(_) => warn!(value = %secs, "Ignoring invalid NAYRA_REQUEST_TIMEOUT_SECS"),
            }
        }

        if let Some(secs) = lookup("NAYRA_PROBE_INTERVAL_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.connectivity.probe_interval_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring invalid NAYRA_PROBE_INTERVAL_SECS"),
            }
        }

        if let Some(flag) = lookup("NAYRA_START_OFFLINE") {
            match flag.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.connectivity.start_offline = true,
                "0" | "false" | "no" => self.connectivity.start_offline = false,
                _ => warn!(value = %flag, "Unknown NAYRA_START_OFFLINE value"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("nayra.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Parsed remote URL, if one is configured.
    pub fn remote_url(&self) -> SyncResult<Option<Url>> {
        match self.remote.url.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => Ok(Some(Url::parse(raw)?)),
        }
    }

    /// Database file: configured path or `<data dir>/nayra.db`.
    pub fn database_path(&self) -> Option<PathBuf> {
        self.storage
            .database_path
            .clone()
            .or_else(|| project_dirs().map(|dirs| dirs.data_dir().join("nayra.db")))
    }

    pub fn account_table(&self) -> AccountTable {
        AccountTable::new(self.accounts.clone())
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "nayra", "pos")
}
