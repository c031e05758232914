use crate::{
    db::{posts::PostRepository, StoreError},
    models::post::{CreatePostRequest, Post},
    services::{cache::Cache, metrics::POST_CACHE_COUNTER},
};

/// Cache key of the full post listing.
pub const ALL_POSTS_KEY: &str = "all_posts";

pub type PostCache = Cache<Vec<Post>>;

pub struct PostService;

impl PostService {
    pub async fn create(
        posts: &dyn PostRepository,
        cache: &PostCache,
        user_id: i64,
        req: &CreatePostRequest,
    ) -> Result<Post, StoreError> {
        let post = posts.create(user_id, req).await?;
        cache.delete(ALL_POSTS_KEY);
        Ok(post)
    }

    pub async fn list(posts: &dyn PostRepository, cache: &PostCache) -> Result<Vec<Post>, StoreError> {
        if let Some(cached) = cache.get(ALL_POSTS_KEY) {
            POST_CACHE_COUNTER.with_label_values(&["hit"]).inc();
            tracing::debug!("post cache hit: {ALL_POSTS_KEY}");
            return Ok(cached);
        }

        // A write landing during the read bumps the generation and the
        // result is returned without being cached.
        let generation = cache.generation();
        let all = posts.find_all().await?;
        POST_CACHE_COUNTER.with_label_values(&["miss"]).inc();
        if cache.set_if_current(ALL_POSTS_KEY, all.clone(), generation) {
            tracing::debug!("post cache miss: {ALL_POSTS_KEY} ({} posts stored)", all.len());
        } else {
            tracing::debug!("post cache miss: {ALL_POSTS_KEY} invalidated during read, not stored");
        }
        Ok(all)
    }

    pub async fn get(posts: &dyn PostRepository, id: i64) -> Result<Option<Post>, StoreError> {
        posts.find_by_id(id).await
    }

    pub async fn delete(
        posts: &dyn PostRepository,
        cache: &PostCache,
        id: i64,
    ) -> Result<bool, StoreError> {
        let deleted = posts.delete(id).await?;
        cache.delete(ALL_POSTS_KEY);
        Ok(deleted)
    }
}
