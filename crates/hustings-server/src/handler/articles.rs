//! Campaign blog articles.
//!
//! Anyone may read published articles. Drafts and archived articles are
//! only visible to callers who could edit them.

use axum::extract::State;
use axum::http::StatusCode;
use hustings_postgres::model::Article as ArticleModel;
use hustings_postgres::query::ArticleRepository;
use hustings_postgres::types::ArticleStatus;
use hustings_postgres::{PgClient, PgConn};

use super::request::{
    ArticlePathParams, CreateArticle, Pagination, SlugPathParams, UpdateArticle,
};
use super::response::{Article, Articles};
use crate::extract::{
    AuthState, Json, OwnershipRule, Path, Permission, Query, RolePermissions, ValidateJson,
};
use crate::handler::{ErrorKind, Result};
use crate::middleware::{PolicyRouter, RoutePolicy};
use crate::service::ServiceState;
use crate::utility::slug::{MAX_SLUG_LENGTH, slugify};

/// Tracing target for article operations.
const TRACING_TARGET: &str = "hustings_server::handler::articles";

/// How many numbered variants of a derived slug are tried.
const MAX_SLUG_ATTEMPTS: u32 = 20;

/// Returns whether the caller may see an unpublished article.
fn can_preview(auth_state: Option<&AuthState>, article: &ArticleModel) -> bool {
    auth_state.is_some_and(|auth_state| {
        OwnershipRule::ARTICLE_UPDATE.permits(
            RolePermissions::global(),
            auth_state,
            article.author_id,
        )
    })
}

/// Hides unpublished articles from callers who may not preview them.
pub(super) fn visible(
    article: Option<ArticleModel>,
    auth_state: Option<&AuthState>,
) -> Result<ArticleModel> {
    match article {
        Some(article) if article.is_published() || can_preview(auth_state, &article) => Ok(article),
        _ => Err(ErrorKind::NotFound
            .with_message("Article not found")
            .with_resource("article")),
    }
}

/// Loads an article for a write, or answers 404.
async fn find_article(conn: &mut PgConn, params: &ArticlePathParams) -> Result<ArticleModel> {
    conn.find_article_by_id(params.article_id)
        .await?
        .ok_or_else(|| {
            ErrorKind::NotFound
                .with_message(format!("Article not found: {}", params.article_id))
                .with_resource("article")
        })
}

/// Derives a free slug from the title, numbering it when taken.
async fn derive_slug(conn: &mut PgConn, title: &str) -> Result<String> {
    let base = slugify(title);
    if base.is_empty() {
        return Err(ErrorKind::BadRequest
            .with_message("Title must contain at least one letter or digit")
            .with_resource("article"));
    }

    if !conn.slug_exists(&base).await? {
        return Ok(base);
    }

    let mut stem = base;
    stem.truncate(MAX_SLUG_LENGTH - 4);
    let stem = stem.trim_end_matches('-');

    for suffix in 2..=MAX_SLUG_ATTEMPTS {
        let candidate = format!("{stem}-{suffix}");
        if !conn.slug_exists(&candidate).await? {
            return Ok(candidate);
        }
    }

    Err(ErrorKind::Conflict
        .with_message("An article with this slug already exists")
        .with_context("Provide an explicit slug")
        .with_resource("article"))
}

/// Lists published articles, newest first.
#[tracing::instrument(skip_all)]
async fn list_articles(
    State(pg_client): State<PgClient>,
    Query(pagination): Query<Pagination>,
) -> Result<(StatusCode, Json<Articles>)> {
    let mut conn = pg_client.get_connection().await?;
    let articles = conn.list_published_articles(pagination.into()).await?;
    Ok((StatusCode::OK, Json(Article::from_models(articles))))
}

/// Returns an article by id.
#[tracing::instrument(skip_all, fields(article_id = %path_params.article_id))]
async fn get_article(
    State(pg_client): State<PgClient>,
    auth_state: Option<AuthState>,
    Path(path_params): Path<ArticlePathParams>,
) -> Result<(StatusCode, Json<Article>)> {
    let mut conn = pg_client.get_connection().await?;
    let article = conn.find_article_by_id(path_params.article_id).await?;
    let article = visible(article, auth_state.as_ref())?;
    Ok((StatusCode::OK, Json(Article::from_model(article))))
}

/// Returns an article by slug.
#[tracing::instrument(skip_all, fields(slug = %path_params.slug))]
async fn get_article_by_slug(
    State(pg_client): State<PgClient>,
    auth_state: Option<AuthState>,
    Path(path_params): Path<SlugPathParams>,
) -> Result<(StatusCode, Json<Article>)> {
    let mut conn = pg_client.get_connection().await?;
    let article = conn.find_article_by_slug(&path_params.slug).await?;
    let article = visible(article, auth_state.as_ref())?;
    Ok((StatusCode::OK, Json(Article::from_model(article))))
}

/// Drafts a new article authored by the caller.
#[tracing::instrument(skip_all, fields(subject_id = %auth_state.subject_id))]
async fn create_article(
    State(pg_client): State<PgClient>,
    auth_state: AuthState,
    ValidateJson(request): ValidateJson<CreateArticle>,
) -> Result<(StatusCode, Json<Article>)> {
    let mut conn = pg_client.get_connection().await?;

    let slug = match request.slug.clone() {
        Some(slug) => slug,
        None => derive_slug(&mut conn, &request.title).await?,
    };

    let article = conn
        .create_article(request.into_model(auth_state.subject_id, slug))
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        article_id = %article.id,
        slug = %article.slug,
        "article drafted"
    );

    Ok((StatusCode::CREATED, Json(Article::from_model(article))))
}

/// Edits an article.
#[tracing::instrument(skip_all, fields(article_id = %path_params.article_id))]
async fn update_article(
    State(pg_client): State<PgClient>,
    auth_state: AuthState,
    Path(path_params): Path<ArticlePathParams>,
    ValidateJson(request): ValidateJson<UpdateArticle>,
) -> Result<(StatusCode, Json<Article>)> {
    if request.status == Some(ArticleStatus::Published) {
        return Err(ErrorKind::BadRequest
            .with_message("Articles are published through the publish endpoint")
            .with_resource("article"));
    }

    let mut conn = pg_client.get_connection().await?;
    let article = find_article(&mut conn, &path_params).await?;
    auth_state.authorize_ownership(OwnershipRule::ARTICLE_UPDATE, article.author_id, "article")?;

    let article = conn
        .update_article(article.id, request.into_model())
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        article_id = %article.id,
        subject_id = %auth_state.subject_id,
        "article updated"
    );

    Ok((StatusCode::OK, Json(Article::from_model(article))))
}

/// Deletes an article together with its comments.
#[tracing::instrument(skip_all, fields(article_id = %path_params.article_id))]
async fn delete_article(
    State(pg_client): State<PgClient>,
    auth_state: AuthState,
    Path(path_params): Path<ArticlePathParams>,
) -> Result<StatusCode> {
    let mut conn = pg_client.get_connection().await?;
    let article = find_article(&mut conn, &path_params).await?;
    auth_state.authorize_ownership(OwnershipRule::ARTICLE_DELETE, article.author_id, "article")?;

    if !conn.delete_article(article.id).await? {
        return Err(ErrorKind::NotFound.with_resource("article"));
    }

    tracing::info!(
        target: TRACING_TARGET,
        article_id = %article.id,
        subject_id = %auth_state.subject_id,
        "article deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Publishes an article. The first publication date is kept on republish.
#[tracing::instrument(skip_all, fields(article_id = %path_params.article_id))]
async fn publish_article(
    State(pg_client): State<PgClient>,
    auth_state: AuthState,
    Path(path_params): Path<ArticlePathParams>,
) -> Result<(StatusCode, Json<Article>)> {
    let mut conn = pg_client.get_connection().await?;
    let Some(article) = conn.publish_article(path_params.article_id).await? else {
        return Err(ErrorKind::NotFound
            .with_message(format!("Article not found: {}", path_params.article_id))
            .with_resource("article"));
    };

    tracing::info!(
        target: TRACING_TARGET,
        article_id = %article.id,
        subject_id = %auth_state.subject_id,
        "article published"
    );

    Ok((StatusCode::OK, Json(Article::from_model(article))))
}

/// Returns a [`PolicyRouter`] with all related routes.
pub fn routes() -> PolicyRouter<ServiceState> {
    PolicyRouter::new()
        .get("/articles", list_articles, RoutePolicy::public())
        .post(
            "/articles",
            create_article,
            RoutePolicy::require([Permission::BlogCreate]),
        )
        .get("/articles/slug/{slug}", get_article_by_slug, RoutePolicy::public())
        .get("/articles/{article_id}", get_article, RoutePolicy::public())
        .patch(
            "/articles/{article_id}",
            update_article,
            RoutePolicy::require(OwnershipRule::ARTICLE_UPDATE.permissions()),
        )
        .delete(
            "/articles/{article_id}",
            delete_article,
            RoutePolicy::require(OwnershipRule::ARTICLE_DELETE.permissions()),
        )
        .post(
            "/articles/{article_id}/publish",
            publish_article,
            RoutePolicy::require([Permission::BlogPublish]),
        )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use hustings_postgres::types::{UserRole, UserStatus};
    use serde_json::{Value, json};

    use crate::handler::test::TestApp;
    use crate::service::FeatureFlags;

    #[tokio::test]
    async fn members_cannot_draft() -> anyhow::Result<()> {
        let app = TestApp::new(FeatureFlags::all())?;
        let token = app.token_for(UserRole::VerifiedMember, UserStatus::Active)?;

        let response = app
            .server
            .post("/articles")
            .authorization_bearer(token)
            .json(&json!({ "title": "Hello", "body": "World" }))
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
        let body: Value = response.json();
        assert_eq!(body["message"], "requires one of: blog:create");
        Ok(())
    }

    #[tokio::test]
    async fn event_admin_cannot_publish_articles() -> anyhow::Result<()> {
        let app = TestApp::new(FeatureFlags::all())?;
        let token = app.token_for(UserRole::EventAdmin, UserStatus::Active)?;

        app.server
            .post("/articles/0195c7b2-0000-7000-8000-000000000000/publish")
            .authorization_bearer(token)
            .await
            .assert_status(StatusCode::FORBIDDEN);
        Ok(())
    }

    #[tokio::test]
    async fn update_cannot_publish() -> anyhow::Result<()> {
        let app = TestApp::new(FeatureFlags::all())?;
        let token = app.token_for(UserRole::BlogAdmin, UserStatus::Active)?;

        app.server
            .patch("/articles/0195c7b2-0000-7000-8000-000000000000")
            .authorization_bearer(token)
            .json(&json!({ "status": "published" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn malformed_article_id_is_rejected() -> anyhow::Result<()> {
        let app = TestApp::new(FeatureFlags::all())?;
        let token = app.token_for(UserRole::BlogAdmin, UserStatus::Active)?;

        let response = app
            .server
            .delete("/articles/not-a-uuid")
            .authorization_bearer(token)
            .await;

        assert!(response.status_code().is_client_error());
        Ok(())
    }
}
