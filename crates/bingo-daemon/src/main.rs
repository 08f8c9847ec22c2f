//! # bingo-daemon
//!
//! Serves the Bingo Boards HTTP API.
//!
//! ## Usage
//!
//! ```sh
//! BINGO_AUTH_SECRET=... bingo-daemon --config bingo.toml
//! bingo-daemon --db ./bingo.db --port 8080 --log-json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use bingo_daemon::{build_router, AppState, DaemonConfig};
use bingo_store::Store;
use chrono::Utc;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

/// Bingo Boards API server.
#[derive(Parser)]
#[command(name = "bingo-daemon", about = "Bingo Boards API server")]
struct Cli {
    /// TOML config file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind (overrides `server.bind`).
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on (overrides `server.port`).
    #[arg(long)]
    port: Option<u16>,

    /// SQLite database path (overrides `database.path`).
    #[arg(long)]
    db: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

impl Cli {
    fn apply(&self, config: &mut DaemonConfig) {
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(db) = &self.db {
            config.database.path = db.clone();
        }
    }
}

fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("bingo_daemon=info".parse()?)
        .add_directive("bingo_store=info".parse()?)
        .add_directive("bingo_board=info".parse()?);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.with_ansi(false).init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json)?;

    let mut config = DaemonConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    if config.auth.callback_secret.is_none() {
        tracing::warn!("no auth callback secret configured; sign-in is disabled");
    }

    let store = Store::open(&config.database.path)
        .with_context(|| format!("opening {}", config.database.path.display()))?;
    store.purge_expired_sessions(Utc::now())?;
    tracing::info!(db = %config.database.path.display(), "store ready");

    let address = format!("{}:{}", config.server.bind, config.server.port);
    let app = build_router(AppState::shared(store, config));

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {address}"))?;
    tracing::info!("listening on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("received Ctrl+C"),
            Err(e) => {
                tracing::error!("failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("received terminate signal");
            }
            Err(e) => {
                tracing::error!("failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
