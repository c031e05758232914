use crate::{
    db::{users::UserRepository, StoreError},
    models::user::User,
    services::posts::PostCache,
};

pub struct UserService;

impl UserService {
    pub async fn get(users: &dyn UserRepository, id: i64) -> Result<Option<User>, StoreError> {
        users.find_by_id(id).await
    }

    pub async fn list(users: &dyn UserRepository) -> Result<Vec<User>, StoreError> {
        users.find_all().await
    }

    /// Soft-delete a user. Their posts drop out of the listing, so the cached
    /// listing is discarded too.
    pub async fn delete(
        users: &dyn UserRepository,
        post_cache: &PostCache,
        id: i64,
    ) -> Result<bool, StoreError> {
        let deleted = users.delete(id).await?;
        if deleted {
            post_cache.purge();
            tracing::info!("user {id} soft-deleted");
        }
        Ok(deleted)
    }
}
