//! Worker role: bind the shared port and serve the greeting.

use anyhow::{Context, Result};
use axum::{Router, extract::State, routing::get};
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpSocket};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;
use hydra_common::HydraError;
use hydra_common::constants::LISTEN_BACKLOG;

/// Per-worker state handed to request handlers
#[derive(Clone)]
pub struct WorkerState {
    /// This worker's own OS pid, fixed for the process lifetime
    pub pid: u32,
}

/// Bind the shared port and serve requests until killed or interrupted.
///
/// A bind failure propagates out and terminates the process; that exit
/// is what the coordinator's observer reports.
pub async fn run(config: AppConfig) -> Result<()> {
    let pid = std::process::id();

    let addr: SocketAddr = config
        .listen_addr()
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.listen_addr()))?;
    let listener = bind_shared(addr)?;

    info!("Worker {} listening at http://localhost:{}", pid, config.port);

    let app = create_router(WorkerState { pid });

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

/// Create the worker router: the greeting at `/`, default 404 elsewhere
pub fn create_router(state: WorkerState) -> Router {
    Router::new()
        .route("/", get(greet))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn greet(State(state): State<WorkerState>) -> String {
    greeting(state.pid)
}

/// Render the greeting body for a worker pid
pub fn greeting(pid: u32) -> String {
    format!("Hello from worker {pid}")
}

/// Bind `addr` with SO_REUSEPORT so every worker can share the port.
/// The kernel distributes inbound connections across the bound sockets.
fn bind_shared(addr: SocketAddr) -> Result<TcpListener> {
    let socket = match addr {
        SocketAddr::V4(_) => TcpSocket::new_v4(),
        SocketAddr::V6(_) => TcpSocket::new_v6(),
    }
    .map_err(|e| HydraError::Bind(format!("failed to create socket: {e}")))?;

    #[cfg(unix)]
    socket
        .set_reuseport(true)
        .map_err(|e| HydraError::Bind(format!("failed to set SO_REUSEPORT: {e}")))?;

    socket
        .bind(addr)
        .map_err(|e| HydraError::Bind(format!("failed to bind {addr}: {e}")))?;

    let listener = socket
        .listen(LISTEN_BACKLOG)
        .map_err(|e| HydraError::Bind(format!("failed to listen on {addr}: {e}")))?;

    Ok(listener)
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[test]
    fn test_greeting_embeds_pid() {
        assert_eq!(greeting(42), "Hello from worker 42");
    }

    #[test]
    fn test_greeting_is_stable_across_calls() {
        let pid = std::process::id();
        assert_eq!(greeting(pid), greeting(pid));
    }

    #[tokio::test]
    async fn test_root_returns_own_pid() {
        let pid = std::process::id();
        let app = create_router(WorkerState { pid });

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, format!("Hello from worker {pid}").as_bytes());
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_greeted() {
        let app = create_router(WorkerState {
            pid: std::process::id(),
        });

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(!body.starts_with(b"Hello from worker"));
    }

    #[tokio::test]
    async fn test_two_workers_can_share_a_port() {
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let first = bind_shared(addr).unwrap();
        let bound = first.local_addr().unwrap();

        // Second bind to the exact same address must succeed thanks to
        // SO_REUSEPORT.
        let second = bind_shared(bound);
        assert!(second.is_ok());
    }
}
