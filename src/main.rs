use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{http::HeaderValue, middleware, routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

use pitchside::adapters::admission::InMemoryAdmission;
use pitchside::adapters::http::commentary::{commentary_routes, CommentaryHandlers};
use pitchside::adapters::http::matches::{match_routes, MatchHandlers};
use pitchside::adapters::http::middleware::admission_middleware;
use pitchside::adapters::http::health;
use pitchside::adapters::postgres::PostgresMatchStore;
use pitchside::adapters::websocket::{
    spawn_sweeper, ws_handler, Broadcaster, ConnectionRegistry, RealtimeState, SubscriptionIndex,
};
use pitchside::application::{
    CreateMatchHandler, ListCommentaryHandler, ListMatchesHandler, PostCommentaryHandler,
};
use pitchside::config::AppConfig;
use pitchside::ports::{AdmissionPolicy, MatchStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);
    tracing::info!("pitchside v{} starting", env!("CARGO_PKG_VERSION"));

    // Database
    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!().run(&pool).await?;
        tracing::info!("migrations applied");
    }

    // Fan-out core
    let registry = Arc::new(ConnectionRegistry::new());
    let index = Arc::new(SubscriptionIndex::new());
    let broadcaster = Broadcaster::new(registry.clone(), index.clone());
    let sweeper = spawn_sweeper(
        registry.clone(),
        index.clone(),
        config.realtime.sweep_interval(),
    );

    let admission: Arc<dyn AdmissionPolicy> =
        Arc::new(InMemoryAdmission::new(config.admission.clone()));

    // Application handlers over the store
    let store: Arc<dyn MatchStore> = Arc::new(PostgresMatchStore::new(pool));
    let match_handlers = MatchHandlers::new(
        CreateMatchHandler::new(store.clone(), broadcaster.clone()),
        ListMatchesHandler::new(store.clone()),
    );
    let commentary_handlers = CommentaryHandlers::new(
        PostCommentaryHandler::new(store.clone(), broadcaster.clone()),
        ListCommentaryHandler::new(store),
    );

    let realtime_state = RealtimeState::new(
        registry.clone(),
        index,
        admission.clone(),
        config.realtime.max_message_bytes,
    );

    // REST surface sits behind the admission middleware; the WebSocket
    // endpoint runs its own admission check inside the upgrade handler.
    let api = match_routes(match_handlers)
        .merge(commentary_routes(commentary_handlers))
        .layer(middleware::from_fn_with_state(
            admission,
            admission_middleware,
        ));

    let app = Router::new()
        .route("/health", get(health))
        .merge(api)
        .route("/ws", get(ws_handler).with_state(realtime_state))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )));

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // Closing the registry drops every pump channel; connected clients
    // receive a normal close frame.
    sweeper.abort();
    registry.close_all().await;
    tracing::info!("shutdown complete");

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
