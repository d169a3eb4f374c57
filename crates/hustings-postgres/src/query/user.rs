//! User repository for account lifecycle, roles and verification.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff::Timestamp;
use uuid::Uuid;

use super::Pagination;
use crate::model::{NewUser, UpdateUser, User};
use crate::types::{UserRole, UserStatus};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for user database operations.
pub trait UserRepository {
    /// Inserts a new user, normalizing the email address and display name.
    fn create_user(&mut self, new_user: NewUser) -> impl Future<Output = PgResult<User>> + Send;

    /// Finds a user by id.
    fn find_user_by_id(
        &mut self,
        user_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Finds a user by email address (case-insensitive).
    fn find_user_by_email(
        &mut self,
        email: &str,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Finds the user holding an outstanding verification token.
    ///
    /// Expects the SHA-256 hex digest of the token, never the token itself.
    fn find_user_by_verification_token(
        &mut self,
        token_hash: &str,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Applies partial updates and bumps `updated_at`.
    fn update_user(
        &mut self,
        user_id: Uuid,
        updates: UpdateUser,
    ) -> impl Future<Output = PgResult<User>> + Send;

    /// Lists users, newest first, optionally filtered by role and status.
    fn list_users(
        &mut self,
        role: Option<UserRole>,
        status: Option<UserStatus>,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<User>>> + Send;

    /// Replaces the role of a user.
    fn set_user_role(
        &mut self,
        user_id: Uuid,
        role: UserRole,
    ) -> impl Future<Output = PgResult<User>> + Send;

    /// Replaces the status of a user.
    fn set_user_status(
        &mut self,
        user_id: Uuid,
        status: UserStatus,
    ) -> impl Future<Output = PgResult<User>> + Send;

    /// Marks the email address as confirmed.
    ///
    /// Activates a pending account, clears the verification token and sets
    /// the given role.
    fn confirm_user_email(
        &mut self,
        user_id: Uuid,
        role: UserRole,
    ) -> impl Future<Output = PgResult<User>> + Send;

    /// Checks whether an email address is already registered.
    fn email_exists(&mut self, email: &str) -> impl Future<Output = PgResult<bool>> + Send;
}

impl UserRepository for PgConnection {
    async fn create_user(&mut self, mut new_user: NewUser) -> PgResult<User> {
        use schema::users;

        new_user.email = new_user.email.trim().to_lowercase();
        new_user.display_name = new_user.display_name.trim().to_owned();

        diesel::insert_into(users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_user_by_id(&mut self, user_id: Uuid) -> PgResult<Option<User>> {
        use schema::users::{self, dsl};

        users::table
            .filter(dsl::id.eq(user_id))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_user_by_email(&mut self, email: &str) -> PgResult<Option<User>> {
        use schema::users::{self, dsl};

        users::table
            .filter(dsl::email.eq(email.trim().to_lowercase()))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_user_by_verification_token(
        &mut self,
        token_hash: &str,
    ) -> PgResult<Option<User>> {
        use schema::users::{self, dsl};

        users::table
            .filter(dsl::verification_token_hash.eq(token_hash))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn update_user(&mut self, user_id: Uuid, mut updates: UpdateUser) -> PgResult<User> {
        use schema::users::{self, dsl};

        if let Some(name) = updates.display_name.as_mut() {
            *name = name.trim().to_owned();
        }
        updates.updated_at = Some(jiff_diesel::Timestamp::from(Timestamp::now()));

        diesel::update(users::table.filter(dsl::id.eq(user_id)))
            .set(&updates)
            .returning(User::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn list_users(
        &mut self,
        role: Option<UserRole>,
        status: Option<UserStatus>,
        pagination: Pagination,
    ) -> PgResult<Vec<User>> {
        use schema::users::{self, dsl};

        let mut query = users::table.into_boxed();
        if let Some(role) = role {
            query = query.filter(dsl::role.eq(role));
        }
        if let Some(status) = status {
            query = query.filter(dsl::status.eq(status));
        }

        query
            .order(dsl::created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(User::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn set_user_role(&mut self, user_id: Uuid, role: UserRole) -> PgResult<User> {
        self.update_user(
            user_id,
            UpdateUser {
                role: Some(role),
                ..Default::default()
            },
        )
        .await
    }

    async fn set_user_status(&mut self, user_id: Uuid, status: UserStatus) -> PgResult<User> {
        self.update_user(
            user_id,
            UpdateUser {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
    }

    async fn confirm_user_email(&mut self, user_id: Uuid, role: UserRole) -> PgResult<User> {
        self.update_user(
            user_id,
            UpdateUser {
                role: Some(role),
                status: Some(UserStatus::Active),
                verification_token_hash: Some(None),
                verification_expires_at: Some(None),
                email_verified_at: Some(Some(jiff_diesel::Timestamp::from(Timestamp::now()))),
                ..Default::default()
            },
        )
        .await
    }

    async fn email_exists(&mut self, email: &str) -> PgResult<bool> {
        use diesel::dsl::exists;
        use schema::users::{self, dsl};

        diesel::select(exists(
            users::table.filter(dsl::email.eq(email.trim().to_lowercase())),
        ))
        .get_result(self)
        .await
        .map_err(PgError::from)
    }
}
