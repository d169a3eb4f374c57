//! Article repository for blog content.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff::Timestamp;
use uuid::Uuid;

use super::Pagination;
use crate::model::{Article, NewArticle, UpdateArticle};
use crate::types::ArticleStatus;
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for article database operations.
pub trait ArticleRepository {
    /// Inserts a new draft article.
    fn create_article(
        &mut self,
        new_article: NewArticle,
    ) -> impl Future<Output = PgResult<Article>> + Send;

    /// Finds an article by id regardless of its status.
    fn find_article_by_id(
        &mut self,
        article_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Article>>> + Send;

    /// Finds an article by slug regardless of its status.
    fn find_article_by_slug(
        &mut self,
        slug: &str,
    ) -> impl Future<Output = PgResult<Option<Article>>> + Send;

    /// Lists published articles, most recently published first.
    fn list_published_articles(
        &mut self,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<Article>>> + Send;

    /// Lists articles of every status written by one author, newest first.
    fn list_articles_by_author(
        &mut self,
        author_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<Article>>> + Send;

    /// Applies partial updates and bumps `updated_at`.
    fn update_article(
        &mut self,
        article_id: Uuid,
        updates: UpdateArticle,
    ) -> impl Future<Output = PgResult<Article>> + Send;

    /// Publishes an article, keeping the original `published_at` on republish.
    fn publish_article(
        &mut self,
        article_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Article>>> + Send;

    /// Deletes an article and its comments. Returns whether a row was removed.
    fn delete_article(&mut self, article_id: Uuid)
    -> impl Future<Output = PgResult<bool>> + Send;

    /// Checks whether a slug is already taken.
    fn slug_exists(&mut self, slug: &str) -> impl Future<Output = PgResult<bool>> + Send;
}

impl ArticleRepository for PgConnection {
    async fn create_article(&mut self, mut new_article: NewArticle) -> PgResult<Article> {
        use schema::articles;

        new_article.title = new_article.title.trim().to_owned();

        diesel::insert_into(articles::table)
            .values(&new_article)
            .returning(Article::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_article_by_id(&mut self, article_id: Uuid) -> PgResult<Option<Article>> {
        use schema::articles::{self, dsl};

        articles::table
            .filter(dsl::id.eq(article_id))
            .select(Article::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_article_by_slug(&mut self, slug: &str) -> PgResult<Option<Article>> {
        use schema::articles::{self, dsl};

        articles::table
            .filter(dsl::slug.eq(slug))
            .select(Article::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_published_articles(&mut self, pagination: Pagination) -> PgResult<Vec<Article>> {
        use schema::articles::{self, dsl};

        articles::table
            .filter(dsl::status.eq(ArticleStatus::Published))
            .order(dsl::published_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(Article::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn list_articles_by_author(
        &mut self,
        author_id: Uuid,
        pagination: Pagination,
    ) -> PgResult<Vec<Article>> {
        use schema::articles::{self, dsl};

        articles::table
            .filter(dsl::author_id.eq(author_id))
            .order(dsl::created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(Article::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn update_article(
        &mut self,
        article_id: Uuid,
        mut updates: UpdateArticle,
    ) -> PgResult<Article> {
        use schema::articles::{self, dsl};

        if let Some(title) = updates.title.as_mut() {
            *title = title.trim().to_owned();
        }
        updates.updated_at = Some(jiff_diesel::Timestamp::from(Timestamp::now()));

        diesel::update(articles::table.filter(dsl::id.eq(article_id)))
            .set(&updates)
            .returning(Article::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn publish_article(&mut self, article_id: Uuid) -> PgResult<Option<Article>> {
        let Some(article) = self.find_article_by_id(article_id).await? else {
            return Ok(None);
        };

        let published_at = article
            .published_at
            .unwrap_or_else(|| jiff_diesel::Timestamp::from(Timestamp::now()));

        let updates = UpdateArticle {
            status: Some(ArticleStatus::Published),
            published_at: Some(Some(published_at)),
            ..Default::default()
        };

        self.update_article(article_id, updates).await.map(Some)
    }

    async fn delete_article(&mut self, article_id: Uuid) -> PgResult<bool> {
        use schema::articles::{self, dsl};

        diesel::delete(articles::table.filter(dsl::id.eq(article_id)))
            .execute(self)
            .await
            .map(|rows| rows > 0)
            .map_err(PgError::from)
    }

    async fn slug_exists(&mut self, slug: &str) -> PgResult<bool> {
        use diesel::dsl::exists;
        use schema::articles::{self, dsl};

        diesel::select(exists(articles::table.filter(dsl::slug.eq(slug))))
            .get_result(self)
            .await
            .map_err(PgError::from)
    }
}
