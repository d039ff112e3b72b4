mod config;
mod logging;

use anyhow::Context;
use clap::Parser;
use config::ServerConfig;
use maintenance_service::MaintenanceServiceModule;
use sea_orm::{ConnectOptions, Database};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "minetrack-server", version, about = "MineTrack maintenance server")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `server.bind_addr`
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut cfg = ServerConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(bind) = cli.bind {
        cfg.server.bind_addr = bind;
    }

    logging::init(&cfg.logging)?;

    let mut options = ConnectOptions::new(cfg.database.url.clone());
    options
        .max_connections(cfg.database.max_connections)
        .connect_timeout(cfg.database.connect_timeout)
        .sqlx_logging(false);
    let conn = Database::connect(options)
        .await
        .context("connecting to database")?;

    let module = MaintenanceServiceModule::default();
    module.init(cfg.maintenance.clone(), Arc::new(conn))?;

    let app = module
        .register_rest(axum::Router::new())?
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&cfg.server.bind_addr)
        .await
        .with_context(|| format!("binding {}", cfg.server.bind_addr))?;
    info!(addr = %cfg.server.bind_addr, "MineTrack server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("MineTrack server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
