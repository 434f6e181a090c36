//! User profile store
//!
//! Read-mostly collaborator backed by the external auth provider in
//! production. The portal trusts it for recipient identity (email, name,
//! role, verification).

use crate::StoreError;
use dashmap::DashMap;
use projhub_types::UserProfile;
use std::sync::Arc;
use uuid::Uuid;

/// Trait for reading and writing user profile documents
#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    /// Save or update a profile document
    async fn save(&self, profile: UserProfile) -> Result<(), StoreError>;

    /// Retrieve a profile by user id
    async fn get(&self, id: Uuid) -> Result<Option<UserProfile>, StoreError>;

    /// Look up a profile by email address
    async fn get_by_email(&self, email: &str) -> Result<Option<UserProfile>, StoreError>;
}

/// In-memory profile store (default implementation)
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileStore {
    profiles: Arc<DashMap<Uuid, UserProfile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn save(&self, profile: UserProfile) -> Result<(), StoreError> {
        self.profiles.insert(profile.id, profile);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.profiles.get(&id).map(|entry| entry.value().clone()))
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<UserProfile>, StoreError> {
        Ok(self
            .profiles
            .iter()
            .find(|entry| entry.value().email == email)
            .map(|entry| entry.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use projhub_types::Role;

    #[tokio::test]
    async fn test_get_by_email() {
        let store = InMemoryProfileStore::new();
        let profile = UserProfile::new("bob@x.edu", "Bob", Role::Student);
        let id = profile.id;
        store.save(profile).await.unwrap();

        let found = store.get_by_email("bob@x.edu").await.unwrap();
        assert_eq!(found.map(|p| p.id), Some(id));

        assert!(store.get_by_email("nobody@x.edu").await.unwrap().is_none());
    }
}
