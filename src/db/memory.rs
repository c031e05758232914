//! In-memory stores backing the unit and router tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::{posts::PostRepository, profiles::ProfileRepository, users::UserRepository, StoreError};
use crate::models::{
    post::{CreatePostRequest, Post},
    profile::{Profile, ProfileRequest},
    user::{NewUser, User},
};

struct StoredUser {
    user: User,
    deleted: bool,
}

struct StoredPost {
    post: Post,
    deleted: bool,
}

#[derive(Default)]
struct Tables {
    users: Vec<StoredUser>,
    profiles: Vec<Profile>,
    posts: Vec<StoredPost>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    failing: bool,
    /// Number of `PostRepository::find_all` calls, to observe cache hits.
    pub post_list_calls: AtomicUsize,
    pub profile_creates: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails like an unreachable database.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    fn tables(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        self.check()?;
        let mut tables = self.tables();
        if tables.users.iter().any(|u| !u.deleted && u.user.email == user.email) {
            return Err(StoreError::DuplicateKey);
        }
        let now = Utc::now();
        let row = User {
            id: tables.users.len() as i64 + 1,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.users.push(StoredUser { user: row.clone(), deleted: false });
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.check()?;
        Ok(self
            .tables()
            .users
            .iter()
            .find(|u| !u.deleted && u.user.email == email)
            .map(|u| u.user.clone()))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        self.check()?;
        Ok(self
            .tables()
            .users
            .iter()
            .find(|u| !u.deleted && u.user.id == id)
            .map(|u| u.user.clone()))
    }

    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        self.check()?;
        Ok(self
            .tables()
            .users
            .iter()
            .filter(|u| !u.deleted)
            .map(|u| u.user.clone())
            .collect())
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        self.check()?;
        let mut tables = self.tables();
        match tables.users.iter_mut().find(|u| !u.deleted && u.user.id == id) {
            Some(u) => {
                u.deleted = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn find_by_user_id(&self, user_id: i64) -> Result<Option<Profile>, StoreError> {
        self.check()?;
        Ok(self
            .tables()
            .profiles
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn create(&self, user_id: i64, req: &ProfileRequest) -> Result<Profile, StoreError> {
        self.check()?;
        self.profile_creates.fetch_add(1, Ordering::SeqCst);
        let mut tables = self.tables();
        if tables.profiles.iter().any(|p| p.user_id == user_id) {
            return Err(StoreError::DuplicateKey);
        }
        let now = Utc::now();
        let profile = Profile {
            id: tables.profiles.len() as i64 + 1,
            user_id,
            name: req.name.clone(),
            bio: req.bio.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn update(&self, id: i64, req: &ProfileRequest) -> Result<Profile, StoreError> {
        self.check()?;
        let mut tables = self.tables();
        let profile = tables
            .profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))?;
        profile.name = req.name.clone();
        profile.bio = req.bio.clone();
        profile.updated_at = Utc::now();
        Ok(profile.clone())
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create(&self, user_id: i64, req: &CreatePostRequest) -> Result<Post, StoreError> {
        self.check()?;
        let mut tables = self.tables();
        let author_email = tables
            .users
            .iter()
            .find(|u| u.user.id == user_id)
            .map(|u| u.user.email.clone())
            .ok_or(StoreError::ForeignKeyViolation)?;
        let now = Utc::now();
        let post = Post {
            id: tables.posts.len() as i64 + 1,
            user_id,
            author_email,
            title: req.title.clone(),
            content: req.content.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.posts.push(StoredPost { post: post.clone(), deleted: false });
        Ok(post)
    }

    async fn find_all(&self) -> Result<Vec<Post>, StoreError> {
        self.check()?;
        self.post_list_calls.fetch_add(1, Ordering::SeqCst);
        let tables = self.tables();
        let mut posts: Vec<Post> = tables
            .posts
            .iter()
            .filter(|p| !p.deleted)
            .filter(|p| {
                tables
                    .users
                    .iter()
                    .any(|u| u.user.id == p.post.user_id && !u.deleted)
            })
            .map(|p| p.post.clone())
            .collect();
        posts.reverse();
        Ok(posts)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, StoreError> {
        self.check()?;
        Ok(self
            .tables()
            .posts
            .iter()
            .find(|p| !p.deleted && p.post.id == id)
            .map(|p| p.post.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        self.check()?;
        let mut tables = self.tables();
        match tables.posts.iter_mut().find(|p| !p.deleted && p.post.id == id) {
            Some(p) => {
                p.deleted = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
