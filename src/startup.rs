//! Application startup and initialization logic
//!
//! Picks the storage backend from the configuration, installs the metrics
//! recorder and builds the `AppState`.

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::app_state::AppState;
use crate::config::Config;
use crate::database;
use crate::storage::{
    InMemoryIdeaStorage, InMemoryTenantStorage, PostgresIdeaStorage, PostgresTenantStorage,
    StorageError, TenantStorage,
};

/// Initialize application services and create the AppState.
pub async fn initialize_app(config: &Config) -> Result<AppState> {
    info!(environment = %config.environment, "Starting feedback API");

    // Initialize Prometheus metrics exporter
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;
    info!("Prometheus metrics initialized");

    let state = match &config.database_url {
        Some(database_url) => {
            let db_pool = database::setup_database(database_url, config.max_connections).await?;
            info!("PostgreSQL connection established");

            database::run_migrations(&db_pool).await?;

            AppState::new(
                Arc::new(PostgresIdeaStorage::new(db_pool.clone())),
                Arc::new(PostgresTenantStorage::new(db_pool)),
                config.clone(),
            )
        }
        None => {
            if config.is_production() {
                warn!("Running production without DATABASE_URL; ideas are lost on restart");
            }
            info!("DATABASE_URL not set, using in-memory storage");
            AppState::new(
                Arc::new(InMemoryIdeaStorage::new()),
                Arc::new(InMemoryTenantStorage::new()),
                config.clone(),
            )
        }
    };

    seed_default_tenant(config, state.tenants.as_ref()).await?;

    Ok(state.with_metrics(metrics_handle))
}

/// Register the configured default tenant; an existing domain is left as is.
pub async fn seed_default_tenant(config: &Config, tenants: &dyn TenantStorage) -> Result<()> {
    let Some(seed) = &config.default_tenant else {
        return Ok(());
    };

    match tenants.add(&seed.name, &seed.domain).await {
        Ok(tenant) => {
            info!(tenant_id = tenant.id, domain = %tenant.domain, "Default tenant registered");
            Ok(())
        }
        Err(StorageError::Conflict(_)) => {
            info!(domain = %seed.domain, "Default tenant already present");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Wait for SIGTERM or SIGINT signal for graceful shutdown
pub async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully");
        },
    }
}
