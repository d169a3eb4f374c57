//! Liveness endpoint for load balancers and orchestrators.

use axum::extract::State;
use axum::http::StatusCode;
use hustings_postgres::PgClient;
use jiff::Timestamp;

use super::response::Health;
use crate::extract::Json;
use crate::handler::Result;
use crate::middleware::{PolicyRouter, RoutePolicy};
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "hustings_server::handler::monitors";

/// Reports whether the server can reach its database.
///
/// Answers 503 with the same body when it cannot.
#[tracing::instrument(skip_all)]
async fn health_status(
    State(pg_client): State<PgClient>,
) -> Result<(StatusCode, Json<Health>)> {
    let database = match pg_client.get_connection().await {
        Ok(_conn) => true,
        Err(error) => {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %error,
                "database unreachable during health check"
            );
            false
        }
    };

    let pool_status = pg_client.pool_status();
    let response = Health {
        is_healthy: database,
        database,
        checked_at: Timestamp::now(),
    };

    let status_code = if response.is_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    tracing::debug!(
        target: TRACING_TARGET,
        is_healthy = response.is_healthy,
        pool_size = pool_status.size,
        pool_available = pool_status.available,
        pool_waiting = pool_status.waiting,
        status_code = status_code.as_u16(),
        "health status prepared"
    );

    Ok((status_code, Json(response)))
}

/// Returns a [`PolicyRouter`] with all related routes.
pub fn routes() -> PolicyRouter<ServiceState> {
    PolicyRouter::new().get("/health", health_status, RoutePolicy::public())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::Value;

    use crate::handler::test::TestApp;
    use crate::service::FeatureFlags;

    #[tokio::test]
    async fn unreachable_database_is_503() -> anyhow::Result<()> {
        let app = TestApp::new(FeatureFlags::all())?;

        let response = app.server.get("/health").await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

        let body: Value = response.json();
        assert_eq!(body["isHealthy"], false);
        assert_eq!(body["database"], false);
        assert!(body["checkedAt"].is_string());
        Ok(())
    }
}
