//! Protocol adherence server binary.
//!
//! Loads configuration, wires stores (PostgreSQL when configured, in-memory
//! otherwise) and serves the REST API until Ctrl-C.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use protocol_adherence::adapters::http::{api_router, AppState};
use protocol_adherence::adapters::{
    InMemoryActionPlanStore, InMemoryPatientDirectory, InMemoryPhaseAccessStore,
    PostgresActionPlanStore, PostgresPatientDirectory, PostgresPhaseAccessStore, SystemClock,
    TracingEventPublisher,
};
use protocol_adherence::application::StoreGuard;
use protocol_adherence::config::{AppConfig, DatabaseConfig, ServerConfig};
use protocol_adherence::ports::{ActionPlanStore, PatientDirectory, PhaseAccessStore};

type Stores = (
    Arc<dyn PatientDirectory>,
    Arc<dyn ActionPlanStore>,
    Arc<dyn PhaseAccessStore>,
);

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(server.log_level.clone()));

    if server.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn connect_stores(database: Option<&DatabaseConfig>) -> Result<Stores, Box<dyn std::error::Error>> {
    let Some(database) = database else {
        tracing::warn!("No database configured, using in-memory stores");
        return Ok((
            Arc::new(InMemoryPatientDirectory::new()),
            Arc::new(InMemoryActionPlanStore::new()),
            Arc::new(InMemoryPhaseAccessStore::new()),
        ));
    };

    let pool = PgPoolOptions::new()
        .min_connections(database.min_connections)
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .idle_timeout(database.idle_timeout())
        .connect(&database.url)
        .await?;

    if database.run_migrations {
        sqlx::migrate::Migrator::new(Path::new("./migrations"))
            .await?
            .run(&pool)
            .await?;
        tracing::info!("Database migrations applied");
    }

    Ok((
        Arc::new(PostgresPatientDirectory::new(pool.clone())),
        Arc::new(PostgresActionPlanStore::new(pool.clone())),
        Arc::new(PostgresPhaseAccessStore::new(pool)),
    ))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.server);

    let (patients, action_plans, phase_access) = connect_stores(config.database.as_ref()).await?;
    let clock = Arc::new(SystemClock::new(config.adherence.utc_offset()?));

    let state = AppState::new(
        patients,
        action_plans,
        phase_access,
        Arc::new(TracingEventPublisher::new()),
        clock,
        StoreGuard::new(config.adherence.store_timeout()),
    );

    let app = api_router(state)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
