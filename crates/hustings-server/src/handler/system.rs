//! Deployment introspection for super admins.

use axum::extract::State;
use axum::http::StatusCode;

use super::response::FeatureFlags;
use crate::extract::{Json, Permission};
use crate::handler::Result;
use crate::middleware::{PolicyRouter, RoutePolicy};
use crate::service::{FeatureFlags as EnabledFlags, ServiceState};

/// Returns the features enabled on this deployment.
#[tracing::instrument(skip_all)]
async fn get_feature_flags(
    State(feature_flags): State<EnabledFlags>,
) -> Result<(StatusCode, Json<FeatureFlags>)> {
    Ok((StatusCode::OK, Json(FeatureFlags::from_flags(&feature_flags))))
}

/// Returns a [`PolicyRouter`] with all related routes.
pub fn routes() -> PolicyRouter<ServiceState> {
    PolicyRouter::new().get(
        "/system/feature-flags",
        get_feature_flags,
        RoutePolicy::require([Permission::SystemFeatureFlags]),
    )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use hustings_postgres::types::{UserRole, UserStatus};
    use serde_json::{Value, json};

    use crate::handler::test::TestApp;
    use crate::service::{FeatureFlag, FeatureFlags};

    #[tokio::test]
    async fn admins_cannot_read_flags() -> anyhow::Result<()> {
        let app = TestApp::new(FeatureFlags::all())?;
        let token = app.token_for(UserRole::Admin, UserStatus::Active)?;

        let response = app
            .server
            .get("/system/feature-flags")
            .authorization_bearer(token)
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
        let body: Value = response.json();
        assert_eq!(body["message"], "requires one of: system:feature_flags");
        Ok(())
    }

    #[tokio::test]
    async fn super_admin_sees_enabled_flags() -> anyhow::Result<()> {
        let app = TestApp::new(FeatureFlags::new([FeatureFlag::Events]))?;
        let token = app.token_for(UserRole::SuperAdmin, UserStatus::Active)?;

        let response = app
            .server
            .get("/system/feature-flags")
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "enabled": ["events"] }));
        Ok(())
    }
}
