mod config;
mod routes;
mod state;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "eventsched-server")]
#[command(about = "Serve the event scheduling API over HTTP")]
struct Cli {
    /// Config file (defaults to ~/.config/eventsched/config.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long)]
    database: Option<String>,

    /// Address to listen on
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,
}

impl Cli {
    /// Flags win over the config file.
    fn apply(self, config: &mut Config) {
        if let Some(database) = self.database {
            config.database.path = database;
        }
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut config = config::load_config(cli.config.as_deref())?;
    cli.apply(&mut config);

    let state = AppState::new(&config)?;
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port))
        .await
        .with_context(|| {
            format!(
                "Failed to bind {}:{}",
                config.server.host, config.server.port
            )
        })?;
    info!(addr = %listener.local_addr()?, "eventsched-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("eventsched-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
