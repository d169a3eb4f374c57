//! Comments under published articles.

use axum::extract::State;
use axum::http::StatusCode;
use hustings_postgres::PgClient;
use hustings_postgres::query::{ArticleCommentRepository, ArticleRepository};

use super::articles::visible;
use super::request::{ArticlePathParams, CommentPathParams, CreateComment, Pagination};
use super::response::{Comment, Comments};
use crate::extract::{AuthState, Json, OwnershipRule, Path, Permission, Query, ValidateJson};
use crate::handler::{ErrorKind, Result};
use crate::middleware::{PolicyRouter, RoutePolicy};
use crate::service::{FeatureFlag, ServiceState};

/// Tracing target for comment operations.
const TRACING_TARGET: &str = "hustings_server::handler::comments";

/// Lists the comments of an article, oldest first.
#[tracing::instrument(skip_all, fields(article_id = %path_params.article_id))]
async fn list_comments(
    State(pg_client): State<PgClient>,
    auth_state: Option<AuthState>,
    Path(path_params): Path<ArticlePathParams>,
    Query(pagination): Query<Pagination>,
) -> Result<(StatusCode, Json<Comments>)> {
    let mut conn = pg_client.get_connection().await?;
    let article = conn.find_article_by_id(path_params.article_id).await?;
    let article = visible(article, auth_state.as_ref())?;

    let comments = conn
        .list_article_comments(article.id, pagination.into())
        .await?;
    Ok((StatusCode::OK, Json(Comment::from_models(comments))))
}

/// Comments on a published article.
#[tracing::instrument(skip_all, fields(article_id = %path_params.article_id))]
async fn create_comment(
    State(pg_client): State<PgClient>,
    auth_state: AuthState,
    Path(path_params): Path<ArticlePathParams>,
    ValidateJson(request): ValidateJson<CreateComment>,
) -> Result<(StatusCode, Json<Comment>)> {
    let mut conn = pg_client.get_connection().await?;
    let article = conn.find_article_by_id(path_params.article_id).await?;
    let article = visible(article, Some(&auth_state))?;

    if !article.is_published() {
        return Err(ErrorKind::BadRequest
            .with_message("Only published articles accept comments")
            .with_resource("comment"));
    }

    let comment = conn
        .create_comment(request.into_model(article.id, auth_state.subject_id))
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        comment_id = %comment.id,
        article_id = %article.id,
        subject_id = %auth_state.subject_id,
        "comment created"
    );

    Ok((StatusCode::CREATED, Json(Comment::from_model(comment))))
}

/// Deletes a comment.
#[tracing::instrument(skip_all, fields(comment_id = %path_params.comment_id))]
async fn delete_comment(
    State(pg_client): State<PgClient>,
    auth_state: AuthState,
    Path(path_params): Path<CommentPathParams>,
) -> Result<StatusCode> {
    let mut conn = pg_client.get_connection().await?;
    let Some(comment) = conn.find_comment_by_id(path_params.comment_id).await? else {
        return Err(ErrorKind::NotFound
            .with_message(format!("Comment not found: {}", path_params.comment_id))
            .with_resource("comment"));
    };

    auth_state.authorize_ownership(OwnershipRule::COMMENT_DELETE, comment.author_id, "comment")?;

    if !conn.delete_comment(comment.id).await? {
        return Err(ErrorKind::NotFound.with_resource("comment"));
    }

    tracing::info!(
        target: TRACING_TARGET,
        comment_id = %comment.id,
        subject_id = %auth_state.subject_id,
        moderated = comment.author_id != auth_state.subject_id,
        "comment deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Returns a [`PolicyRouter`] with all related routes.
pub fn routes() -> PolicyRouter<ServiceState> {
    PolicyRouter::new()
        .get(
            "/articles/{article_id}/comments",
            list_comments,
            RoutePolicy::public().with_feature(FeatureFlag::Comments),
        )
        .post(
            "/articles/{article_id}/comments",
            create_comment,
            RoutePolicy::require([Permission::CommentCreate]).with_feature(FeatureFlag::Comments),
        )
        .delete(
            "/comments/{comment_id}",
            delete_comment,
            RoutePolicy::require(OwnershipRule::COMMENT_DELETE.permissions())
                .with_feature(FeatureFlag::Comments),
        )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use hustings_postgres::types::{UserRole, UserStatus};
    use serde_json::json;

    use crate::handler::test::TestApp;
    use crate::service::{FeatureFlag, FeatureFlags};

    #[tokio::test]
    async fn hidden_when_comments_disabled() -> anyhow::Result<()> {
        let app = TestApp::new(FeatureFlags::new([FeatureFlag::Registration]))?;
        let token = app.token_for(UserRole::SuperAdmin, UserStatus::Active)?;

        app.server
            .get("/articles/0195c7b2-0000-7000-8000-000000000000/comments")
            .await
            .assert_status_not_found();

        app.server
            .delete("/comments/0195c7b2-0000-7000-8000-000000000000")
            .authorization_bearer(token)
            .await
            .assert_status_not_found();
        Ok(())
    }

    #[tokio::test]
    async fn unverified_members_cannot_comment() -> anyhow::Result<()> {
        let app = TestApp::new(FeatureFlags::all())?;
        let token = app.token_for(UserRole::Member, UserStatus::Pending)?;

        app.server
            .post("/articles/0195c7b2-0000-7000-8000-000000000000/comments")
            .authorization_bearer(token)
            .json(&json!({ "body": "First!" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
        Ok(())
    }

    #[tokio::test]
    async fn anonymous_comment_is_401() -> anyhow::Result<()> {
        let app = TestApp::new(FeatureFlags::all())?;
        app.server
            .post("/articles/0195c7b2-0000-7000-8000-000000000000/comments")
            .json(&json!({ "body": "First!" }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }
}
