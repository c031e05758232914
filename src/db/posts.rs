use async_trait::async_trait;
use sqlx::PgPool;

use super::StoreError;
use crate::models::post::{CreatePostRequest, Post};

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, user_id: i64, req: &CreatePostRequest) -> Result<Post, StoreError>;
    /// Live posts whose author has not been deleted, newest first.
    async fn find_all(&self) -> Result<Vec<Post>, StoreError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, StoreError>;
    /// Soft delete. Returns false when no live post had this id.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}

pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn create(&self, user_id: i64, req: &CreatePostRequest) -> Result<Post, StoreError> {
        let post = sqlx::query_as::<_, Post>(
            "WITH inserted AS (
                 INSERT INTO posts (user_id, title, content)
                 VALUES ($1, $2, $3)
                 RETURNING *
             )
             SELECT i.id, i.user_id, u.email AS author_email, i.title, i.content,
                    i.created_at, i.updated_at
             FROM inserted i
             JOIN users u ON u.id = i.user_id",
        )
        .bind(user_id)
        .bind(&req.title)
        .bind(&req.content)
        .fetch_one(&self.pool)
        .await?;
        Ok(post)
    }

    async fn find_all(&self) -> Result<Vec<Post>, StoreError> {
        let posts = sqlx::query_as::<_, Post>(
            "SELECT p.id, p.user_id, u.email AS author_email, p.title, p.content,
                    p.created_at, p.updated_at
             FROM posts p
             JOIN users u ON u.id = p.user_id
             WHERE p.deleted_at IS NULL AND u.deleted_at IS NULL
             ORDER BY p.created_at DESC, p.id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, StoreError> {
        let post = sqlx::query_as::<_, Post>(
            "SELECT p.id, p.user_id, u.email AS author_email, p.title, p.content,
                    p.created_at, p.updated_at
             FROM posts p
             JOIN users u ON u.id = p.user_id
             WHERE p.id = $1 AND p.deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(post)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE posts SET deleted_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
