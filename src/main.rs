//! PolicyPal API server.

use std::sync::Arc;

use http::HeaderValue;
use secrecy::{ExposeSecret, Secret};
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tokio::sync::watch;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use policy_pal::adapters::ai::{HttpChatGateway, HttpGatewayConfig};
use policy_pal::adapters::http::{api_router, AppState};
use policy_pal::adapters::postgres::{PostgresLeadRepository, PostgresProductCatalog};
use policy_pal::adapters::storage::{
    InMemoryLeadRepository, InMemoryProductCatalog, InMemorySessionStore,
};
use policy_pal::application::{
    CatalogService, ChatOrchestrator, ChatOrchestratorConfig, LeadService, SessionReaper,
};
use policy_pal::config::{AiConfig, AppConfig, DatabaseConfig, ServerConfig};
use policy_pal::ports::{LeadRepository, ProductCatalog};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.server);

    info!(
        environment = ?config.server.environment,
        model_configured = config.ai.is_configured(),
        "Starting PolicyPal"
    );

    let (catalog, leads) = connect_storage(&config.database).await?;
    let gateway = HttpChatGateway::new(gateway_config(&config.ai))?;
    if !config.ai.is_configured() {
        warn!("Chat model not configured, replies will be rule-based");
    }

    let orchestrator = Arc::new(ChatOrchestrator::with_config(
        Arc::new(InMemorySessionStore::new()),
        Arc::new(gateway),
        catalog.clone(),
        ChatOrchestratorConfig::default()
            .with_batch_size(config.chat.recommendation_batch_size)
            .with_idle_timeout(config.chat.idle_timeout()),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let reaper = SessionReaper::new(orchestrator.clone(), config.chat.reap_interval());
    let reaper_task = tokio::spawn(async move { reaper.run(shutdown_rx).await });

    let state = AppState::new(
        orchestrator,
        Arc::new(CatalogService::new(catalog)),
        Arc::new(LeadService::new(leads)),
    );

    let app = api_router(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(true);
    if let Err(e) = reaper_task.await {
        error!(error = %e, "Session reaper task failed");
    }

    info!("Server stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if server.is_production() {
        subscriber.json().init();
    } else {
        subscriber.pretty().init();
    }
}

async fn connect_storage(
    database: &DatabaseConfig,
) -> Result<(Arc<dyn ProductCatalog>, Arc<dyn LeadRepository>), Box<dyn std::error::Error>> {
    let Some(url) = database.url() else {
        warn!("No database configured, using in-memory storage with demo products");
        return Ok((
            Arc::new(InMemoryProductCatalog::with_demo_products()),
            Arc::new(InMemoryLeadRepository::new()),
        ));
    };

    let pool = PgPoolOptions::new()
        .min_connections(database.min_connections)
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .idle_timeout(database.idle_timeout())
        .max_lifetime(database.max_lifetime())
        .connect(url)
        .await?;
    info!("Database connection established");

    if database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Database migrations applied");
    }

    Ok((
        Arc::new(PostgresProductCatalog::new(pool.clone())),
        Arc::new(PostgresLeadRepository::new(pool)),
    ))
}

fn gateway_config(ai: &AiConfig) -> HttpGatewayConfig {
    HttpGatewayConfig::with_secret(
        ai.endpoint.clone(),
        Secret::new(ai.api_key.expose_secret().clone()),
    )
    .with_model(ai.model.clone())
    .with_temperature(ai.temperature)
    .with_max_tokens(ai.max_tokens)
    .with_timeout(ai.timeout())
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
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
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }

    info!("Shutting down gracefully...");
}
