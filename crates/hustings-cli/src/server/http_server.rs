//! Plain HTTP listener.

use std::future::IntoFuture;
use std::io;
use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;

use super::lifecycle::Lifecycle;
use super::shutdown::wait_for_stop_signal;
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};
use crate::config::ServerConfig;

/// Binds the configured address and serves with graceful shutdown.
///
/// In-flight requests get the configured shutdown timeout to finish once a
/// signal arrives; whatever is still running after that is dropped.
pub async fn serve_http(app: Router, server_config: ServerConfig) -> io::Result<()> {
    let server_addr = server_config.server_addr();

    let listener = TcpListener::bind(server_addr).await.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_SERVER_STARTUP,
            addr = %server_addr,
            error = %err,
            "Failed to bind to address"
        );
        err
    })?;

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        addr = %server_addr,
        "Server is ready and listening for connections"
    );

    let shutdown_timeout = server_config.shutdown_timeout();
    let (signalled_tx, mut signalled_rx) = watch::channel(false);
    let shutdown = async move {
        let signal = wait_for_stop_signal().await;
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            signal = %signal,
            timeout_secs = shutdown_timeout.as_secs(),
            "Graceful shutdown initiated"
        );
        let _ = signalled_tx.send(true);
    };

    let lifecycle = Lifecycle::start(&server_config);
    let result = async move {
        let server = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .into_future();

        let deadline = async move {
            if signalled_rx.wait_for(|signalled| *signalled).await.is_err() {
                std::future::pending::<()>().await;
            }
            tokio::time::sleep(shutdown_timeout).await;
        };

        tokio::select! {
            result = server => result,
            () = deadline => {
                tracing::warn!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    timeout_secs = shutdown_timeout.as_secs(),
                    "Shutdown timeout elapsed, dropping in-flight requests"
                );
                Ok(())
            }
        }
    }
    .await;

    lifecycle.finish(result)
}
