//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use bloglist_core::domain::{Blog, User};
use bloglist_core::error::RepoError;
use bloglist_core::ports::{BlogRepository, UserRepository};

use super::entity::blog::{self, Entity as BlogEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL blog repository.
pub type PostgresBlogRepository = PostgresBaseRepository<BlogEntity>;

impl PostgresUserRepository {
    /// Rewrite `blog_ids` in place with a single UPDATE.
    async fn rewrite_blog_ids(&self, user_id: Uuid, blog_ids: SimpleExpr) -> Result<(), RepoError> {
        let result = UserEntity::update_many()
            .col_expr(user::Column::BlogIds, blog_ids)
            .col_expr(user::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(user::Column::Id.eq(user_id))
            .exec(self.conn())
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .order_by_asc(user::Column::CreatedAt)
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(user::Column::CreatedAt)
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn attach_blog(&self, user_id: Uuid, blog_id: Uuid) -> Result<(), RepoError> {
        self.rewrite_blog_ids(
            user_id,
            Expr::cust_with_values("blog_ids || jsonb_build_array($1::text)", [blog_id.to_string()]),
        )
        .await
    }

    async fn detach_blog(&self, user_id: Uuid, blog_id: Uuid) -> Result<(), RepoError> {
        self.rewrite_blog_ids(
            user_id,
            Expr::cust_with_values("blog_ids - $1::text", [blog_id.to_string()]),
        )
        .await
    }
}

#[async_trait]
impl BlogRepository for PostgresBlogRepository {
    async fn find_all(&self) -> Result<Vec<Blog>, RepoError> {
        let result = BlogEntity::find()
            .order_by_asc(blog::Column::CreatedAt)
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Blog>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = BlogEntity::find()
            .filter(blog::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(blog::Column::CreatedAt)
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
