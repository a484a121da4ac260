use std::time::Duration;

use anyhow::{self, Error as AnyhowError};
use db::models::session::Session;
use server::{AppState, file_logging, routes};
use sqlx::Error as SqlxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorkboardError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Sqlx(#[from] SqlxError),
    #[error(transparent)]
    Other(#[from] AnyhowError),
}

/// How often expired sessions are swept.
const SESSION_SWEEP_INTERVAL_SECS: u64 = 3600;

#[tokio::main]
async fn main() -> Result<(), CorkboardError> {
    // Load .env file if present (for development)
    dotenvy::dotenv().ok();

    // The guard must be held for the lifetime of the application so logs
    // are flushed on shutdown
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _file_log_guard = file_logging::init_logging(&log_level);

    let state = AppState::new().await?;

    // Sweep expired sessions on startup and then periodically
    let sweep_state = state.clone();
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(Duration::from_secs(SESSION_SWEEP_INTERVAL_SECS));
        loop {
            interval.tick().await;
            match Session::delete_expired(&sweep_state.db().pool).await {
                Ok(count) if count > 0 => {
                    tracing::info!("Swept {} expired session(s)", count);
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Failed to sweep expired sessions: {}", e);
                }
            }
        }
    });

    let app_router = routes::router(state.clone());

    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.trim().parse::<u16>().ok())
        .unwrap_or(3001);
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

    let listener = tokio::net::TcpListener::bind(format!("{host}:{port}")).await?;
    let actual_port = listener.local_addr()?.port();

    tracing::info!("Server running on http://{host}:{actual_port}");

    axum::serve(listener, app_router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    perform_cleanup_actions(&state).await;

    Ok(())
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let terminate = async {
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
            } else {
                tracing::error!("Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        };

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await;
    }
}

pub async fn perform_cleanup_actions(state: &AppState) {
    // Run TRUNCATE checkpoint so all WAL content is written to the main
    // database before the process exits.
    tracing::info!("Running final WAL checkpoint...");
    match sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
        .execute(&state.db().pool)
        .await
    {
        Ok(_) => tracing::info!("Final WAL checkpoint completed"),
        Err(e) => tracing::warn!("Final WAL checkpoint failed: {}", e),
    }

    tracing::info!("Closing database connection pool...");
    state.db().pool.close().await;
    tracing::info!("Database connection pool closed");
}
