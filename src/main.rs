//! CampBar trip engine
//!
//! Main application entry point

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use campbar::{
    config::{DatabaseBackend, Settings},
    database::{connection, MemoryTripStore, PgTripStore, TripStore},
    handlers::{router, AppState},
    middleware::AuthService,
    services::TripEngine,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenv::dotenv() {
        // A missing .env is normal outside development
        eprintln!("No .env loaded: {}", e);
    }

    // Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    settings.validate().context("invalid configuration")?;

    // Initialize logging; the guard flushes the file writer on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", campbar::info());

    let store: Arc<dyn TripStore> = match settings.database.backend {
        DatabaseBackend::Postgres => {
            info!("Connecting to database...");
            let db_config = connection::DatabaseConfig::from(&settings.database);
            let pool = connection::create_pool(&db_config)
                .await
                .context("failed to connect to database")?;
            connection::run_migrations(&pool).await?;
            Arc::new(PgTripStore::new(pool))
        }
        DatabaseBackend::Memory => {
            warn!("Using the in-memory store; data is lost on restart");
            Arc::new(MemoryTripStore::new())
        }
    };

    let engine = TripEngine::from_settings(store, &settings)?;
    let auth = AuthService::new(&settings.auth);
    let app = router(AppState::new(engine, auth));

    let address = settings.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    info!("Listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("CampBar has been shut down.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
