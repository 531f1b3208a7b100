//! Main entry point for the tokengate backend.
//!
//! This file initializes logging and configuration, opens the selected
//! storage backend, and serves the authentication API until shutdown.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod repositories;
mod utils;

use anyhow::{Context, Result};
use auth::service::Authenticator;
use config::{Config, StorageBackend};
use database::Database;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::fmt::init;
use utils::password::PasswordHasher;

#[tokio::main]
async fn main() -> Result<()> {
    init();

    let config = Config::from_env()?;
    let hasher = PasswordHasher::new(config.bcrypt_cost)?;

    let (authenticator, database) = match config.storage_backend {
        StorageBackend::Sqlite => {
            let db = Database::new(&config).await?;
            info!("Using SQLite storage at {}", config.database_url);
            (Authenticator::sqlite(db.pool().clone(), hasher), Some(db))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; users and tokens are lost on restart");
            (Authenticator::in_memory(hasher), None)
        }
    };

    let app = api::app_router(Arc::new(authenticator), &config.cors_allowed_origins);

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    info!("Starting tokengate server on port {}", config.server_port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if let Some(db) = database {
        db.close().await;
    }
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C signal"),
        () = terminate => info!("Received SIGTERM signal"),
    }
}
