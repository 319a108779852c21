// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP server lifecycle: bind, serve, and drain on shutdown.
//!
//! The server runs in a background task. When the shutdown future resolves,
//! the listener stops accepting and in-flight requests get
//! [`SHUTDOWN_GRACE`] to finish. After that the serve task is aborted and
//! [`serve`] returns. Aborting stops the accept loop only: connection tasks
//! still running a request live until the tokio runtime shuts down, which
//! for the binary is right after `main` returns.

use std::{
    future::Future,
    net::{AddrParseError, SocketAddr},
    time::Duration,
};

use axum::Router;
use tokio::{net::TcpListener, task::JoinError};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// How long in-flight requests may run after shutdown begins.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Host used when the listen url is a bare `:port`.
const ANY_HOST: &str = "0.0.0.0";

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serve: {0}")]
    Serve(#[source] std::io::Error),
    #[error("server task failed: {0}")]
    Task(#[from] JoinError),
}

/// Parse a listen url such as `:9080` or `127.0.0.1:9080`.
pub fn parse_listen_url(url: &str) -> Result<SocketAddr, AddrParseError> {
    let url = url.trim();
    match url.strip_prefix(':') {
        Some(port) => format!("{ANY_HOST}:{port}").parse(),
        None => url.parse(),
    }
}

pub async fn bind(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })
}

/// Serve `app` until `signal` resolves, then drain for [`SHUTDOWN_GRACE`].
pub async fn serve<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()>,
{
    serve_with_grace(listener, app, signal, SHUTDOWN_GRACE).await
}

pub async fn serve_with_grace<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    grace: Duration,
) -> Result<(), ServerError>
where
    F: Future<Output = ()>,
{
    let shutdown = CancellationToken::new();
    let draining = shutdown.clone();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { draining.cancelled().await })
            .await
    });

    tokio::select! {
        result = &mut server => {
            return result?.map_err(ServerError::Serve);
        }
        _ = signal => {}
    }

    info!(grace_ms = grace.as_millis() as u64, "Shutting down server");
    shutdown.cancel();

    match tokio::time::timeout(grace, &mut server).await {
        Ok(result) => result?.map_err(ServerError::Serve)?,
        Err(_) => {
            warn!("Requests still running after grace period, abandoning them");
            server.abort();
        }
    }

    info!("Server stopped");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C shutdown signal"),
        _ = terminate => info!("Received SIGTERM shutdown signal"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use std::time::Instant;
    use tokio::sync::oneshot;

    fn slow_app(delay: Duration) -> Router {
        Router::new().route(
            "/slow",
            get(move || async move {
                tokio::time::sleep(delay).await;
                "done"
            }),
        )
    }

    async fn local_listener() -> (TcpListener, SocketAddr) {
        let listener = bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
        let addr = listener.local_addr().unwrap();
        (listener, addr)
    }

    #[test]
    fn bare_port_listens_on_all_interfaces() {
        assert_eq!(
            parse_listen_url(":9080").unwrap(),
            "0.0.0.0:9080".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(
            parse_listen_url("127.0.0.1:8000").unwrap(),
            "127.0.0.1:8000".parse::<SocketAddr>().unwrap()
        );
        assert!(parse_listen_url(":http").is_err());
        assert!(parse_listen_url("").is_err());
    }

    #[tokio::test]
    async fn in_flight_request_completes_during_shutdown() {
        let (listener, addr) = local_listener().await;
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(serve(
            listener,
            slow_app(Duration::from_millis(500)),
            async move {
                let _ = stop_rx.await;
            },
        ));

        let request = tokio::spawn(async move {
            reqwest::get(format!("http://{addr}/slow")).await?.text().await
        });
        tokio::time::sleep(Duration::from_millis(100)).await;
        stop_tx.send(()).unwrap();

        assert_eq!(request.await.unwrap().unwrap(), "done");
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn serve_returns_after_grace_despite_stuck_request() {
        let (listener, addr) = local_listener().await;
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(serve_with_grace(
            listener,
            slow_app(Duration::from_secs(60)),
            async move {
                let _ = stop_rx.await;
            },
            Duration::from_millis(200),
        ));

        let _request = tokio::spawn(reqwest::get(format!("http://{addr}/slow")));
        tokio::time::sleep(Duration::from_millis(100)).await;

        let started = Instant::now();
        stop_tx.send(()).unwrap();
        server.await.unwrap().unwrap();
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
