//! Serve command - run the HTTP extraction API.

use clap::Args;
use console::style;
use tokio::net::TcpListener;
use tracing::info;

use ratewatch_core::{BankRegistry, Credentials};

use super::config::load_config;
use crate::api::{AppState, build_router};

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Socket address to bind (default: server.bind from config)
    #[arg(short, long)]
    bind: Option<String>,
}

pub async fn run(args: ServeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let registry = BankRegistry::load(config.registry_path.as_deref())?;
    let state = AppState::from_config(&config, &Credentials::from_env(), registry);
    let app = build_router(state, &config.server);

    let bind = args.bind.unwrap_or_else(|| config.server.bind.clone());
    let listener = TcpListener::bind(&bind).await?;
    let addr = listener.local_addr()?;

    info!(%addr, route = %config.server.route, "server listening");
    println!(
        "{} Listening on http://{}{}",
        style("✓").green(),
        addr,
        config.server.route
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
