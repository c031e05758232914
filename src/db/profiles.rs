use async_trait::async_trait;
use sqlx::PgPool;

use super::StoreError;
use crate::models::profile::{Profile, ProfileRequest};

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_by_user_id(&self, user_id: i64) -> Result<Option<Profile>, StoreError>;
    async fn create(&self, user_id: i64, req: &ProfileRequest) -> Result<Profile, StoreError>;
    async fn update(&self, id: i64, req: &ProfileRequest) -> Result<Profile, StoreError>;
}

pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn find_by_user_id(&self, user_id: i64) -> Result<Option<Profile>, StoreError> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    async fn create(&self, user_id: i64, req: &ProfileRequest) -> Result<Profile, StoreError> {
        let profile = sqlx::query_as::<_, Profile>(
            "INSERT INTO profiles (user_id, name, bio)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(user_id)
        .bind(&req.name)
        .bind(&req.bio)
        .fetch_one(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn update(&self, id: i64, req: &ProfileRequest) -> Result<Profile, StoreError> {
        let profile = sqlx::query_as::<_, Profile>(
            "UPDATE profiles
             SET name = $1, bio = $2, updated_at = NOW()
             WHERE id = $3
             RETURNING *",
        )
        .bind(&req.name)
        .bind(&req.bio)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(profile)
    }
}
