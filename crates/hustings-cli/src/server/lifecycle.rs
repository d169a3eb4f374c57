//! Startup and exit reporting for a running server.

use std::io;
use std::time::Instant;

use crate::config::ServerConfig;
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Tracks one server run from bind to exit.
#[derive(Debug)]
pub struct Lifecycle {
    started_at: Instant,
}

impl Lifecycle {
    /// Reports the effective configuration and starts the uptime clock.
    pub fn start(config: &ServerConfig) -> Self {
        if config.binds_to_all_interfaces() {
            tracing::warn!(
                target: TRACING_TARGET_SERVER_STARTUP,
                host = %config.host,
                "Listening on every interface, keep the port behind a firewall"
            );
        }

        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            host = %config.host,
            port = config.port,
            shutdown_timeout_secs = config.shutdown_timeout,
            development = config.is_development(),
            "Server configuration"
        );

        Self {
            started_at: Instant::now(),
        }
    }

    /// Reports how the run ended and passes the result through.
    pub fn finish(self, result: io::Result<()>) -> io::Result<()> {
        let uptime_secs = self.started_at.elapsed().as_secs();

        let Err(err) = result else {
            tracing::info!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                uptime_secs,
                "Server stopped"
            );
            return Ok(());
        };

        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %err,
            kind = ?err.kind(),
            uptime_secs,
            hint = bind_hint(err.kind()).unwrap_or("none"),
            "Server exited with an error"
        );

        Err(err)
    }
}

/// Operator hint for the usual reasons a listener fails to bind.
fn bind_hint(kind: io::ErrorKind) -> Option<&'static str> {
    let hint = match kind {
        io::ErrorKind::PermissionDenied => "ports below 1024 need elevated privileges",
        io::ErrorKind::AddrInUse => "another process already listens on this port",
        io::ErrorKind::AddrNotAvailable => "HOST is not an address of this machine",
        _ => return None,
    };

    Some(hint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_exit_is_ok() {
        let lifecycle = Lifecycle::start(&ServerConfig::default());
        assert!(lifecycle.finish(Ok(())).is_ok());
    }

    #[test]
    fn errors_pass_through() {
        let lifecycle = Lifecycle::start(&ServerConfig::default());
        let result = lifecycle.finish(Err(io::Error::from(io::ErrorKind::AddrInUse)));
        assert!(matches!(result, Err(err) if err.kind() == io::ErrorKind::AddrInUse));
    }

    #[test]
    fn hints_only_for_bind_failures() {
        assert!(bind_hint(io::ErrorKind::AddrInUse).is_some());
        assert!(bind_hint(io::ErrorKind::PermissionDenied).is_some());
        assert!(bind_hint(io::ErrorKind::UnexpectedEof).is_none());
    }
}
