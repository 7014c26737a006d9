//! HTTP listener with graceful shutdown

use std::future::Future;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use tokio::{net::TcpListener, sync::oneshot};

/// How long in-flight requests get to finish once shutdown starts
pub const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Serve `app` on `listener` until `shutdown` resolves.
///
/// The server runs in its own task. Once `shutdown` fires it stops accepting
/// connections and gets [`SHUTDOWN_GRACE_PERIOD`] to drain; after that the
/// task is aborted. Returns an error only if the server stops by itself.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send,
{
    let (drain_tx, drain_rx) = oneshot::channel::<()>();

    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = drain_rx.await;
            })
            .await
    });

    tokio::select! {
        result = &mut server => {
            result
                .context("HTTP server task panicked")?
                .context("HTTP server failed")?;
            anyhow::bail!("HTTP server stopped unexpectedly");
        }
        _ = shutdown => {}
    }

    tracing::info!("Shutting down server");
    let _ = drain_tx.send(());

    match tokio::time::timeout(SHUTDOWN_GRACE_PERIOD, &mut server).await {
        Ok(result) => {
            result
                .context("HTTP server task panicked")?
                .context("HTTP server failed during shutdown")?;
            tracing::info!("Server shutdown successfully");
        }
        Err(_) => {
            server.abort();
            tracing::warn!(
                grace_period_secs = SHUTDOWN_GRACE_PERIOD.as_secs(),
                "Requests still in flight after grace period, forcing shutdown"
            );
        }
    }

    Ok(())
}

/// Resolves on SIGINT or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
