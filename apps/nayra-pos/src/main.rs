//! # Nayra POS Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        nayra-pos                                        │
//! │                                                                         │
//! │  1. Parse arguments (clap)                                              │
//! │  2. Initialize tracing (stderr)                                         │
//! │  3. Load config: file ─► NAYRA_* env ─► validate                        │
//! │  4. Open AppState: local store, remote, initial ping                    │
//! │  5. Catch up: reconcile anything left from an offline run               │
//! │  6. Restore session, run the command, print JSON                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Examples
//! ```text
//! nayra-pos login admin admin123
//! nayra-pos products add --name Milk --stock 100 --price 60 --unit packet --category milk
//! nayra-pos --offline sales record <product-id> 4 --type counter
//! nayra-pos reports generate --date 2024-01-01
//! nayra-pos reports export 2024-01-01 --dir ./reports
//! nayra-pos watch
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use nayra_core::SaleType;
use nayra_pos::commands::{
    backup, dashboard, product, report, sale, session, settings, sync,
};
use nayra_pos::state::EventPrinter;
use nayra_pos::{init_tracing, AppState, RemoteKind, StartupOptions};
use nayra_sync::{AppConfig, ConnectivityMonitor, SyncEventEmitter};

// =============================================================================
// Arguments
// =============================================================================

#[derive(Debug, Parser)]
#[command(name = "nayra-pos", version, about = "Nayra dairy point of sale")]
struct Cli {
    /// Config file (default: <config dir>/nayra.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Do not contact the remote store
    #[arg(long, global = true)]
    offline: bool,

    /// Remote store backend
    #[arg(long, global = true, value_enum, default_value_t = RemoteKind::Rest)]
    remote: RemoteKind,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in with one of the configured accounts
    Login { username: String, password: String },
    /// Log out
    Logout,
    /// Show the logged-in role
    Whoami,
    /// Show where opening a screen (e.g. /inventory) lands
    Open { path: String },
    /// Today's takings and low-stock products
    Dashboard,
    /// Inventory
    #[command(subcommand)]
    Products(ProductCommand),
    /// Sales ledger
    #[command(subcommand)]
    Sales(SaleCommand),
    /// Daily summaries
    #[command(subcommand)]
    Reports(ReportCommand),
    /// Snapshot all collections into the backup slot
    Backup,
    /// Overwrite local data with the backup
    Restore,
    /// Sync state and manual reconcile
    #[command(subcommand)]
    Sync(SyncCommand),
    /// Delete all local data (requires --yes)
    Clear {
        #[arg(long)]
        yes: bool,
    },
    /// Configuration file helpers
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Probe the remote and reconcile on reconnect until Ctrl+C
    Watch,
}

#[derive(Debug, Subcommand)]
enum ProductCommand {
    List {
        #[arg(long)]
        category: Option<String>,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        stock: i64,
        /// Rupees, e.g. 60 or 48.50
        #[arg(long)]
        price: String,
        #[arg(long)]
        unit: String,
        #[arg(long, default_value = "milk")]
        category: String,
    },
    Remove {
        id: String,
    },
    /// Edit one field: stock, price, name, unit or category
    Update {
        id: String,
        field: String,
        value: String,
    },
}

#[derive(Debug, Subcommand)]
enum SaleCommand {
    Record {
        product_id: String,
        quantity: i64,
        #[arg(long = "type", default_value = "counter")]
        sale_type: SaleType,
    },
    List {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Debug, Subcommand)]
enum ReportCommand {
    /// Summarize a day (default: today)
    Generate {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    List,
    Remove {
        date: NaiveDate,
    },
    /// Write sales-report-<date>.xlsx
    Export {
        date: NaiveDate,
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
enum SyncCommand {
    Status,
    Reconcile,
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Write a default config file
    Init,
}

// =============================================================================
// Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let command = match cli.command {
        Command::Config(cmd) => return run_config(&cmd, cli.config),
        command => command,
    };

    let config = AppConfig::load(cli.config).context("Failed to load configuration")?;
    let options = StartupOptions {
        remote: cli.remote,
        offline: cli.offline,
    };
    let state = AppState::open(config, &options).await?;
    state.catch_up().await?;

    run(command, &state).await
}

async fn run(command: Command, state: &AppState) -> anyhow::Result<()> {
    let mut current = state.session().await?;

    match command {
        Command::Login { username, password } => {
            print_json(&session::login(&mut current, &username, &password).await?)
        }
        Command::Logout => {
            session::logout(&mut current).await?;
            print_json(&"logged out")
        }
        Command::Whoami => print_json(&session::whoami(&current)),
        Command::Open { path } => print_json(&session::navigate(&current, &path)?),
        Command::Dashboard => print_json(&dashboard::dashboard(state, &current).await?),

        Command::Products(cmd) => match cmd {
            ProductCommand::List { category } => {
                print_json(&product::list_products(state, &current, category.as_deref()).await?)
            }
            ProductCommand::Add {
                name,
                stock,
                price,
                unit,
                category,
            } => {
                let form = product::ProductForm {
                    name,
                    stock,
                    price,
                    unit,
                    category,
                };
                print_json(&product::add_product(state, &current, form).await?)
            }
            ProductCommand::Remove { id } => {
                print_json(&product::remove_product(state, &current, &id).await?)
            }
            ProductCommand::Update { id, field, value } => print_json(
                &product::update_product(state, &current, &id, &field, &value).await?,
            ),
        },

        Command::Sales(cmd) => match cmd {
            SaleCommand::Record {
                product_id,
                quantity,
                sale_type,
            } => {
                let form = sale::SaleForm {
                    product_id,
                    quantity,
                    sale_type,
                };
                print_json(&sale::record_sale(state, &current, form).await?)
            }
            SaleCommand::List { date } => {
                print_json(&sale::list_sales(state, &current, date).await?)
            }
        },

        Command::Reports(cmd) => match cmd {
            ReportCommand::Generate { date } => {
                let date = date.unwrap_or_else(|| Utc::now().date_naive());
                print_json(&report::generate_summary(state, &current, date).await?)
            }
            ReportCommand::List => print_json(&report::list_summaries(state, &current).await?),
            ReportCommand::Remove { date } => {
                print_json(&report::remove_summary(state, &current, date).await?)
            }
            ReportCommand::Export { date, dir } => {
                let path = report::export_summary(state, &current, date, &dir).await?;
                print_json(&path)
            }
        },

        Command::Backup => print_json(&backup::backup(state, &current).await?),
        Command::Restore => print_json(&backup::restore(state, &current).await?),

        Command::Sync(cmd) => match cmd {
            SyncCommand::Status => print_json(&sync::sync_status(state, &current).await?),
            SyncCommand::Reconcile => print_json(&sync::reconcile(state, &current).await?),
        },

        Command::Clear { yes } => {
            if !yes {
                anyhow::bail!("Refusing to clear local data without --yes");
            }
            settings::clear_local_data(state, &mut current).await?;
            print_json(&"local data cleared")
        }

        Command::Watch => watch(state).await,

        Command::Config(cmd) => run_config(&cmd, None),
    }
}

fn run_config(cmd: &ConfigCommand, path: Option<PathBuf>) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let mut config = AppConfig::load(path)?;
            if config.remote.api_key.is_some() {
                config.remote.api_key = Some("<redacted>".into());
            }
            for account in &mut config.accounts {
                account.password = "<redacted>".into();
            }
            print_json(&config)
        }
        ConfigCommand::Init => {
            let path = path
                .or_else(AppConfig::default_config_path)
                .context("Could not determine config directory")?;
            if path.exists() {
                anyhow::bail!("{} already exists", path.display());
            }
            AppConfig::default().save(Some(path.clone()))?;
            print_json(&path)
        }
    }
}

// =============================================================================
// Watch
// =============================================================================

async fn watch(state: &AppState) -> anyhow::Result<()> {
    let emitter: Arc<dyn SyncEventEmitter> = Arc::new(EventPrinter::new(std::io::stdout()));
    let monitor = ConnectivityMonitor::new(state.ctx().clone(), emitter).spawn();
    let probe = state.probe().spawn();
    info!("Watching connectivity, press Ctrl+C to stop");

    shutdown_signal().await;

    probe.shutdown().await?;
    monitor.shutdown().await?;
    info!("Watch stopped");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(?e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(?e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
