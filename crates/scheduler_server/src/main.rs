//! Scheduler web server entry point.
//!
//! Loads configuration, starts logging, opens the database and serves the
//! calendar API until interrupted.

mod config;
mod routes;

use crate::config::AppConfig;
use crate::routes::{router, AppState};
use log::{info, warn};
use scheduler_core::db::open_db;
use scheduler_core::init_logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_logging(&config.log_level, &config.log_dir)?;

    let conn = open_db(&config.db_path)?;
    let app = router(AppState::new(conn));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(
        "event=server_start module=server status=ok addr={} version={}",
        config.bind_addr,
        scheduler_core::core_version()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("event=server_signal module=server status=error error={err}");
        std::future::pending::<()>().await;
    }
}
