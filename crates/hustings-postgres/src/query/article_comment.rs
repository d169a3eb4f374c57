//! Comment repository for article discussions.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use super::Pagination;
use crate::model::{ArticleComment, NewArticleComment};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for article comment database operations.
pub trait ArticleCommentRepository {
    /// Inserts a new comment.
    fn create_comment(
        &mut self,
        new_comment: NewArticleComment,
    ) -> impl Future<Output = PgResult<ArticleComment>> + Send;

    /// Finds a comment by id.
    fn find_comment_by_id(
        &mut self,
        comment_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<ArticleComment>>> + Send;

    /// Lists the comments of an article, oldest first.
    fn list_article_comments(
        &mut self,
        article_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<ArticleComment>>> + Send;

    /// Deletes a comment. Returns whether a row was removed.
    fn delete_comment(&mut self, comment_id: Uuid)
    -> impl Future<Output = PgResult<bool>> + Send;
}

impl ArticleCommentRepository for PgConnection {
    async fn create_comment(
        &mut self,
        mut new_comment: NewArticleComment,
    ) -> PgResult<ArticleComment> {
        use schema::article_comments;

        new_comment.body = new_comment.body.trim().to_owned();

        diesel::insert_into(article_comments::table)
            .values(&new_comment)
            .returning(ArticleComment::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_comment_by_id(&mut self, comment_id: Uuid) -> PgResult<Option<ArticleComment>> {
        use schema::article_comments::{self, dsl};

        article_comments::table
            .filter(dsl::id.eq(comment_id))
            .select(ArticleComment::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_article_comments(
        &mut self,
        article_id: Uuid,
        pagination: Pagination,
    ) -> PgResult<Vec<ArticleComment>> {
        use schema::article_comments::{self, dsl};

        article_comments::table
            .filter(dsl::article_id.eq(article_id))
            .order(dsl::created_at.asc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(ArticleComment::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn delete_comment(&mut self, comment_id: Uuid) -> PgResult<bool> {
        use schema::article_comments::{self, dsl};

        diesel::delete(article_comments::table.filter(dsl::id.eq(comment_id)))
            .execute(self)
            .await
            .map(|rows| rows > 0)
            .map_err(PgError::from)
    }
}
