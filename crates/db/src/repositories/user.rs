//! User repository.

use std::sync::Arc;

use super::map_db_err;
use crate::entities::{User, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    sea_query::Expr,
};
use vidtube_common::AppResult;

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a user whose username or email equals the given identifier.
    pub async fn find_by_login(&self, identifier: &str) -> AppResult<Option<user::Model>> {
        let identifier = identifier.trim().to_lowercase();
        User::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(identifier.clone()))
                    .add(user::Column::Email.eq(identifier)),
            )
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Check whether either the username or the email is taken.
    pub async fn exists_by_username_or_email(&self, username: &str, email: &str) -> AppResult<bool> {
        let found = User::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(username.trim().to_lowercase()))
                    .add(user::Column::Email.eq(email.trim().to_lowercase())),
            )
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(found.is_some())
    }

    /// Create a new user.
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a user.
    pub async fn update(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Store (or clear) the refresh token issued to a user.
    pub async fn set_refresh_token(&self, id: &str, token: Option<String>) -> AppResult<()> {
        User::update_many()
            .col_expr(user::Column::RefreshToken, Expr::value(token))
            .col_expr(user::Column::UpdatedAt, Expr::current_timestamp().into())
            .filter(user::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(())
    }
}
