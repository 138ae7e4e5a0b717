//! # Sightline Server
//!
//! Main entry point: loads configuration, sets up logging, error reporting
//! and metrics, connects Postgres and Redis, wires the DI module and serves
//! HTTP until Ctrl+C or SIGTERM.

use axum::routing::get;
use shaku::HasComponent;
use sightline_config::{AppConfig, ConfigLoader};
use sightline_core::{SightlineError, SightlineResult};
use sightline_repository::{DatabasePool, DatabasePoolInterface};
use sightline_rest::create_router_from_module;
use sightline_server::di::build_app_module;
use sightline_server::startup::{print_banner, print_startup_info};
use sightline_server::telemetry::{init_error_reporting, init_tracing, install_metrics};
use sightline_service::connect_pool;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ConfigLoader::from_default_location().load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(&config.observability) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    let _error_reporting = match init_error_reporting(&config.observability, &config.app.environment) {
        Ok(guard) => guard,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    print_banner();
    info!("Starting Sightline server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Application error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> SightlineResult<()> {
    let metrics = install_metrics(&config.observability)?;

    let database = DatabasePool::connect_lazy(&config.database)?;
    if config.database.run_migrations {
        database.run_migrations().await?;
    }

    let redis_pool = match connect_pool(&config.redis).await {
        Ok(pool) => Some(pool),
        Err(e) => {
            warn!("Redis unavailable, cache calls will fail until restart: {}", e);
            None
        }
    };

    let module = build_app_module(&config, database, redis_pool.clone())?;

    let mut router = create_router_from_module(&module, &config.server);
    if let Some(handle) = metrics {
        router = router.route(
            &config.observability.metrics_path,
            get(move || std::future::ready(handle.render())),
        );
    }

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SightlineError::Internal(format!("Failed to bind {}: {}", addr, e)))?;
    print_startup_info(&config);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| SightlineError::Internal(format!("REST server error: {}", e)))?;

    if let Some(pool) = redis_pool {
        info!("Closing Redis connection pool...");
        pool.close();
    }
    let database: Arc<dyn DatabasePoolInterface> = module.resolve();
    database.close().await;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
