use std::{env, net::SocketAddr};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tokio::sync::broadcast::error::RecvError;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::events::EventBus;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load bind address and upload cap from configs or env vars, with sensible fallbacks
fn load_server_settings() -> Result<(SocketAddr, usize), StartupError> {
    let (host, port, max_upload_bytes) = match configs::load_default() {
        Ok(cfg) => {
            let s = cfg.server;
            (s.host, s.port, s.max_upload_bytes)
        }
        Err(_) => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8080);
            (host, port, 10 * 1024 * 1024)
        }
    };
    let addr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bad bind address: {e}")))?;
    Ok((addr, max_upload_bytes))
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    // DB connection; schema bootstrap is idempotent and stays out of request handling
    let db = models::db::connect().await?;
    migration::Migrator::up(&db, None)
        .await
        .map_err(|e| StartupError::Runtime(format!("migrate up: {e}")))?;

    // Mutation event bus. The logging task stands in for the external
    // notification channel; the catalog core works without any subscriber.
    let events = EventBus::default();
    let mut updates = events.subscribe();
    tokio::spawn(async move {
        loop {
            match updates.recv().await {
                Ok(event) => info!(id = event.id(), ?event, "product event"),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    });

    let state = ServerState { db, events };

    // Build router
    let cors = build_cors();
    let (addr, max_upload_bytes) = load_server_settings()?;
    let app: Router = routes::build_router(state, cors, max_upload_bytes);

    // Bind and serve
    info!(%addr, "starting catalog server");
    println!("starting catalog server at {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
