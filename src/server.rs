//! HTTP server initialization and runtime setup.
//!
//! Handles storage selection, migrations, the report worker, and the Axum
//! server lifecycle.

use crate::application::services::AdminAuth;
use crate::config::{Config, StorageBackend};
use crate::domain::report_worker::run_report_worker;
use crate::domain::repositories::{LinkRepository, ReportRepository};
use crate::infrastructure::persistence::{
    MemoryLinkRepository, MemoryReportRepository, PgLinkRepository, PgReportRepository,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Opens a PostgreSQL pool tuned from configuration and applies migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn connect_database(config: &Config) -> Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required for STORAGE=postgres")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;
    tracing::info!("Migrations applied");

    Ok(pool)
}

async fn build_repositories(
    config: &Config,
) -> Result<(Arc<dyn LinkRepository>, Arc<dyn ReportRepository>)> {
    match config.storage {
        StorageBackend::Postgres => {
            let pool = Arc::new(connect_database(config).await?);
            Ok((
                Arc::new(PgLinkRepository::new(pool.clone())),
                Arc::new(PgReportRepository::new(pool)),
            ))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; links are lost on restart");
            Ok((
                Arc::new(MemoryLinkRepository::new()),
                Arc::new(MemoryReportRepository::new()),
            ))
        }
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Link and report storage (PostgreSQL with migrations, or in-memory)
/// - Background report worker
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - The admin token digest is malformed
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let (link_repository, report_repository) = build_repositories(&config).await?;

    let admin_auth = AdminAuth::new(
        config.admin_token_secret.clone(),
        config.admin_token.as_deref(),
    )
    .context("ADMIN_TOKEN must be hex")?;

    let (report_tx, report_rx) = mpsc::channel(config.report_queue_capacity);
    let worker = tokio::spawn(run_report_worker(report_rx, report_repository));
    tracing::info!("Report worker started");

    let state = AppState::new(link_repository, report_tx, admin_auth, &config.base_url);
    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router (and with it the last report sender) is gone; let the
    // worker drain what is queued.
    match worker.await {
        Ok(persisted) => tracing::info!(persisted, "Shutdown complete"),
        Err(e) => tracing::error!(error = %e, "Report worker panicked"),
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
