use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::app::{app, AppState};
use crate::config::{config, AppConfig, StoreKind};
use crate::database::{DatabaseManager, MemoryStore, PgStore};

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    #[arg(long, help = "Bind address (overrides SERVER_HOST)")]
    pub host: Option<String>,

    #[arg(long, help = "Bind port (overrides SERVER_PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Persistence backend: postgres or memory (overrides API_STORE)")]
    pub store: Option<StoreKind>,

    #[arg(long, help = "Seed the memory store with a demo collector and household")]
    pub demo: bool,
}

pub async fn handle(args: ServeArgs) -> anyhow::Result<()> {
    let config = resolve(config().clone(), &args);
    config.validate().map_err(anyhow::Error::msg)?;

    info!("Starting Waste Collection API in {:?} mode", config.environment);

    let state = match config.api.store {
        StoreKind::Postgres => {
            let pool = DatabaseManager::connect(&config.database)?;
            if config.database.run_migrations {
                DatabaseManager::migrate(&pool).await?;
            }
            AppState::new(PgStore::new(pool), config.clone())
        }
        StoreKind::Memory => {
            let store = if args.demo {
                MemoryStore::demo().await?
            } else {
                MemoryStore::new()
            };
            info!("Using in-memory store; data is lost on shutdown");
            AppState::new(store, config.clone())
        }
    };

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

/// Command-line flags win over the environment
fn resolve(mut config: AppConfig, args: &ServeArgs) -> AppConfig {
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(store) = args.store {
        config.api.store = store;
    }
    config
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
