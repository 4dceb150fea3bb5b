use axum::{Router, routing::get};
use rustacast::config::{Config, LoggingConfig};
use rustacast::server::AppState;
use rustacast::station::Station;
use rustacast::storage::{DocumentStore, FileStore};
use rustacast::transport;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let loaded = Config::load();

    let default_directives = loaded
        .as_ref()
        .ok()
        .and_then(|c| c.logging.as_ref())
        .map(LoggingConfig::directives)
        .unwrap_or_else(|| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directives));

    let timer = tracing_subscriber::fmt::time::LocalTime::new(time::macros::format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(timer)
        .init();

    let config = loaded.unwrap_or_else(|e| {
        warn!("Using default config: {}", e);
        Config::default()
    });

    let docs = DocumentStore::new(&config.storage.data_dir)?;
    let files = FileStore::new(&config.storage.media_dir)?;
    let station = Station::new(docs);

    let shared_state = Arc::new(AppState {
        station,
        files,
        config: config.clone(),
    });

    let app = Router::new()
        .route("/ws", get(transport::websocket_server::websocket_handler))
        .with_state(shared_state.clone())
        .merge(transport::http_server::router(shared_state))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::cors::CorsLayer::permissive());

    let address = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("Rustacast station listening on {}", address);

    let listener = tokio::net::TcpListener::bind(address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
