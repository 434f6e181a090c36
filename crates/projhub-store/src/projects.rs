//! Project read store
//!
//! Only title lookups are needed by the notification path.

use crate::StoreError;
use dashmap::DashMap;
use projhub_types::Project;
use std::sync::Arc;
use uuid::Uuid;

/// Trait for reading project documents
#[async_trait::async_trait]
pub trait ProjectStore: Send + Sync {
    /// Save or update a project record
    async fn save(&self, project: Project) -> Result<(), StoreError>;

    /// Retrieve a project by id
    async fn get(&self, id: Uuid) -> Result<Option<Project>, StoreError>;

    /// Find the project assigned to a team, if any
    async fn find_by_team(&self, team_id: Uuid) -> Result<Option<Project>, StoreError>;
}

/// In-memory project store (default implementation)
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectStore {
    projects: Arc<DashMap<Uuid, Project>>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn save(&self, project: Project) -> Result<(), StoreError> {
        self.projects.insert(project.id, project);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        Ok(self.projects.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_by_team(&self, team_id: Uuid) -> Result<Option<Project>, StoreError> {
        Ok(self
            .projects
            .iter()
            .find(|entry| entry.value().team_id == Some(team_id))
            .map(|entry| entry.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_by_team() {
        let store = InMemoryProjectStore::new();
        let team_id = Uuid::new_v4();

        let mut project = Project::new("Adaptive Scheduling");
        project.team_id = Some(team_id);
        store.save(project.clone()).await.unwrap();

        let found = store.find_by_team(team_id).await.unwrap();
        assert_eq!(found.map(|p| p.title), Some("Adaptive Scheduling".into()));

        assert!(store.find_by_team(Uuid::new_v4()).await.unwrap().is_none());
    }
}
