pub mod app;
pub mod config;
pub mod db;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;

use std::sync::Arc;

use sqlx::PgPool;

use config::Config;
use db::{
    posts::{PgPostRepository, PostRepository},
    profiles::{PgProfileRepository, ProfileRepository},
    users::{PgUserRepository, UserRepository},
};
use services::{password::PasswordHasher, posts::PostCache, tokens::TokenService};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub users: Arc<dyn UserRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub tokens: Arc<TokenService>,
    pub hasher: PasswordHasher,
    pub post_cache: Arc<PostCache>,
}

impl AppState {
    pub fn new(
        config: Config,
        users: Arc<dyn UserRepository>,
        profiles: Arc<dyn ProfileRepository>,
        posts: Arc<dyn PostRepository>,
        hasher: PasswordHasher,
    ) -> anyhow::Result<Self> {
        let tokens = TokenService::from_config(&config);
        let post_cache = PostCache::new(config.post_cache_size)?;
        Ok(Self {
            config: Arc::new(config),
            users,
            profiles,
            posts,
            tokens: Arc::new(tokens),
            hasher,
            post_cache: Arc::new(post_cache),
        })
    }

    /// Postgres-backed state; all repositories share the one pool.
    pub fn from_pool(pool: PgPool, config: Config) -> anyhow::Result<Self> {
        Self::new(
            config,
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgProfileRepository::new(pool.clone())),
            Arc::new(PgPostRepository::new(pool)),
            PasswordHasher::default(),
        )
    }
}
