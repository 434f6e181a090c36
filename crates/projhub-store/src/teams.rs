//! Team roster store
//!
//! Acceptance of an invitation issues a single "add member" mutation here,
//! not a multi-step transaction. The mutation is idempotent at the roster
//! level (no id appears twice).

use crate::StoreError;
use dashmap::DashMap;
use projhub_types::Team;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Trait for persisting teams and mutating their rosters
#[async_trait::async_trait]
pub trait TeamStore: Send + Sync {
    /// Save or update a team record
    async fn save(&self, team: Team) -> Result<(), StoreError>;

    /// Retrieve a team by id
    async fn get(&self, id: Uuid) -> Result<Option<Team>, StoreError>;

    /// Append a member to a team's roster
    ///
    /// Returns `true` if the member was newly added, `false` if they were
    /// already on the roster. Fails with `TeamNotFound` for unknown teams.
    async fn add_member(&self, team_id: Uuid, user_id: Uuid) -> Result<bool, StoreError>;
}

/// In-memory team store (default implementation)
#[derive(Debug, Clone, Default)]
pub struct InMemoryTeamStore {
    teams: Arc<DashMap<Uuid, Team>>,
}

impl InMemoryTeamStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl TeamStore for InMemoryTeamStore {
    async fn save(&self, team: Team) -> Result<(), StoreError> {
        debug!(team_id = %team.id, name = %team.name, "Saving team");
        self.teams.insert(team.id, team);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Team>, StoreError> {
        Ok(self.teams.get(&id).map(|entry| entry.value().clone()))
    }

    async fn add_member(&self, team_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let mut entry = self
            .teams
            .get_mut(&team_id)
            .ok_or(StoreError::TeamNotFound(team_id))?;

        let added = entry.value_mut().add_member(user_id);
        if added {
            info!(team_id = %team_id, user_id = %user_id, "Added member to team roster");
        } else {
            debug!(team_id = %team_id, user_id = %user_id, "Member already on roster");
        }
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_member() {
        let store = InMemoryTeamStore::new();
        let team = Team::new("T-Alpha", Uuid::new_v4());
        let team_id = team.id;
        store.save(team).await.unwrap();

        let bob = Uuid::new_v4();
        assert!(store.add_member(team_id, bob).await.unwrap());

        let roster = store.get(team_id).await.unwrap().unwrap().members;
        assert!(roster.contains(&bob));
    }

    #[tokio::test]
    async fn test_add_member_twice_is_idempotent() {
        let store = InMemoryTeamStore::new();
        let team = Team::new("T-Alpha", Uuid::new_v4());
        let team_id = team.id;
        store.save(team).await.unwrap();

        let bob = Uuid::new_v4();
        assert!(store.add_member(team_id, bob).await.unwrap());
        assert!(!store.add_member(team_id, bob).await.unwrap());

        let roster = store.get(team_id).await.unwrap().unwrap().members;
        assert_eq!(roster.iter().filter(|id| **id == bob).count(), 1);
    }

    #[tokio::test]
    async fn test_add_member_unknown_team() {
        let store = InMemoryTeamStore::new();
        let result = store.add_member(Uuid::new_v4(), Uuid::new_v4()).await;
        assert!(matches!(result, Err(StoreError::TeamNotFound(_))));
    }
}
