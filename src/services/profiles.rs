use crate::{
    db::{profiles::ProfileRepository, StoreError},
    models::profile::{Profile, ProfileRequest},
};

pub struct ProfileService;

impl ProfileService {
    /// Create the caller's profile, or overwrite it when one exists.
    ///
    /// Only a definite "no profile" creates; a failing lookup is returned as is.
    pub async fn upsert(
        profiles: &dyn ProfileRepository,
        user_id: i64,
        req: &ProfileRequest,
    ) -> Result<Profile, StoreError> {
        match profiles.find_by_user_id(user_id).await? {
            Some(existing) => profiles.update(existing.id, req).await,
            None => match profiles.create(user_id, req).await {
                // A concurrent first write won the unique user_id; update theirs.
                Err(StoreError::DuplicateKey) => {
                    tracing::debug!("profile for user_id={user_id} created concurrently, updating");
                    let existing = profiles
                        .find_by_user_id(user_id)
                        .await?
                        .ok_or(StoreError::DuplicateKey)?;
                    profiles.update(existing.id, req).await
                }
                other => other,
            },
        }
    }

    pub async fn get(
        profiles: &dyn ProfileRepository,
        user_id: i64,
    ) -> Result<Option<Profile>, StoreError> {
        profiles.find_by_user_id(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::Barrier;

    use super::*;
    use crate::db::memory::MemoryStore;

    /// Holds the first two lookups at a barrier so both callers see "no profile".
    struct RacingLookups {
        inner: MemoryStore,
        lookups: AtomicUsize,
        barrier: Barrier,
    }

    #[async_trait]
    impl ProfileRepository for RacingLookups {
        async fn find_by_user_id(&self, user_id: i64) -> Result<Option<Profile>, StoreError> {
            let found = self.inner.find_by_user_id(user_id).await?;
            if self.lookups.fetch_add(1, Ordering::SeqCst) < 2 {
                self.barrier.wait().await;
            }
            Ok(found)
        }

        async fn create(&self, user_id: i64, req: &ProfileRequest) -> Result<Profile, StoreError> {
            ProfileRepository::create(&self.inner, user_id, req).await
        }

        async fn update(&self, id: i64, req: &ProfileRequest) -> Result<Profile, StoreError> {
            self.inner.update(id, req).await
        }
    }

    fn request(name: &str, bio: &str) -> ProfileRequest {
        ProfileRequest {
            name: name.into(),
            bio: bio.into(),
        }
    }

    #[tokio::test]
    async fn test_upsert_creates_then_updates() {
        let store = MemoryStore::new();

        let created = ProfileService::upsert(&store, 1, &request("New User", "Hello"))
            .await
            .unwrap();
        assert_eq!((created.name.as_str(), created.bio.as_str()), ("New User", "Hello"));

        let updated = ProfileService::upsert(&store, 1, &request("Updated User", "Updated Bio"))
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Updated User");
        assert_eq!(store.profile_creates.load(Ordering::SeqCst), 1);

        let fetched = ProfileService::get(&store, 1).await.unwrap().unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn test_lookup_failure_does_not_create() {
        let store = MemoryStore::failing();

        let result = ProfileService::upsert(&store, 1, &request("Name", "")).await;
        assert!(matches!(result, Err(StoreError::Database(_))));
        assert_eq!(store.profile_creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_profile_is_none() {
        let store = MemoryStore::new();
        assert!(ProfileService::get(&store, 2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_first_upserts_both_succeed() {
        let profiles = Arc::new(RacingLookups {
            inner: MemoryStore::new(),
            lookups: AtomicUsize::new(0),
            barrier: Barrier::new(2),
        });

        let spawn_upsert = |name: &'static str| {
            let profiles = profiles.clone();
            tokio::spawn(async move {
                ProfileService::upsert(profiles.as_ref(), 7, &request(name, "")).await
            })
        };
        let first = spawn_upsert("First");
        let second = spawn_upsert("Second");

        let first = first.await.unwrap().unwrap();
        let second = second.await.unwrap().unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(profiles.inner.profile_creates.load(Ordering::SeqCst), 2);

        let stored = ProfileService::get(&profiles.inner, 7).await.unwrap().unwrap();
        assert!(stored.name == first.name || stored.name == second.name);
    }
}
