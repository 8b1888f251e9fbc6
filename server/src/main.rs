//! Eisen server entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use eisen_server::csrf::{CsrfStore, CSRF_SWEEP_INTERVAL_SECS};
use eisen_server::rate_limit::RouteLimits;
use eisen_server::repository::{init_db, TaskRepository};
use eisen_server::{app_router, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.data_dir)?;

    let conn = init_db(&config.db_path())?;
    let repo = TaskRepository::new(Arc::new(Mutex::new(conn)));

    let csrf = Arc::new(CsrfStore::new());
    let sweeper = Arc::clone(&csrf);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(CSRF_SWEEP_INTERVAL_SECS));
        loop {
            ticker.tick().await;
            sweeper.sweep(Utc::now().timestamp_millis());
        }
    });

    let limits = if config.rate_limit_disabled {
        None
    } else {
        Some(Arc::new(RouteLimits::new()))
    };

    let state = AppState { repo, csrf, limits };
    let app = app_router(state, &config.static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running on http://localhost:{}", config.port);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}
