use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use brieflink_api::config::ServerConfig;
use brieflink_api::router::build_app_router;
use brieflink_api::state::AppState;
use brieflink_events::{EventBus, EventTracer};
use brieflink_workflow::pg::{PgProfileDirectory, PgRecordStore};
use brieflink_workflow::Workflow;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str =
    "brieflink_api=debug,brieflink_workflow=debug,brieflink_events=info,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = brieflink_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    brieflink_db::health_check(&pool)
        .await
        .context("Database health check failed")?;

    brieflink_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    let tracer_handle = tokio::spawn(EventTracer::run(event_bus.subscribe()));

    // --- Workflow services ---
    let workflow = Workflow::new(
        Arc::new(PgRecordStore::new(pool.clone())),
        Arc::new(PgProfileDirectory::new(pool)),
        Arc::clone(&event_bus),
        config.workflow.clone(),
    );

    let state = AppState {
        config: Arc::new(config.clone()),
        workflow,
        event_bus,
    };

    let app = build_app_router(state, &config).context("Failed to build router")?;

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().context("Invalid HOST address")?,
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // The router (and with it the last bus sender) is gone, so the tracer
    // sees the channel close and returns.
    tracing::info!("Server stopped accepting connections, draining event tracer");
    match tokio::time::timeout(
        Duration::from_secs(config.shutdown_timeout_secs),
        tracer_handle,
    )
    .await
    {
        Ok(Ok(seen)) => tracing::info!(events = seen, "Event tracer stopped"),
        Ok(Err(e)) => tracing::warn!(error = %e, "Event tracer task failed"),
        Err(_) => tracing::warn!("Event tracer did not stop in time"),
    }

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for SIGINT or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
