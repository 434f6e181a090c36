//! Invitation record store

use crate::StoreError;
use dashmap::DashMap;
use projhub_types::Invitation;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Trait for persisting invitation records
///
/// Implement this to customize where invitations are stored. The default
/// implementation keeps everything in memory.
#[async_trait::async_trait]
pub trait InvitationStore: Send + Sync {
    /// Save or update an invitation record
    async fn save(&self, invitation: Invitation) -> Result<(), StoreError>;

    /// Retrieve an invitation by id
    async fn get(&self, id: Uuid) -> Result<Option<Invitation>, StoreError>;

    /// Replace an invitation only if the stored record is still pending
    ///
    /// Terminal writes race with each other (a user acceptance vs. the
    /// expiry timer); this is the conditional write that lets exactly one
    /// of them win. Returns `Ok(false)` when the stored record already
    /// turned terminal, leaving it untouched.
    async fn save_if_pending(&self, invitation: Invitation) -> Result<bool, StoreError>;

    /// Find the pending invitation for a recipient on a team, if any
    ///
    /// A new invite to the same recipient supersedes this record, so at most
    /// one pending invitation exists per (team, recipient) pair.
    async fn find_pending(
        &self,
        team_id: Uuid,
        invited_user_id: Uuid,
    ) -> Result<Option<Invitation>, StoreError>;

    /// List all invitations addressed to a team
    async fn list_for_team(&self, team_id: Uuid) -> Result<Vec<Invitation>, StoreError>;
}

/// In-memory invitation store (default implementation)
#[derive(Debug, Clone, Default)]
pub struct InMemoryInvitationStore {
    invitations: Arc<DashMap<Uuid, Invitation>>,
}

impl InMemoryInvitationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl InvitationStore for InMemoryInvitationStore {
    async fn save(&self, invitation: Invitation) -> Result<(), StoreError> {
        debug!(
            invitation_id = %invitation.id,
            status = %invitation.status,
            "Saving invitation"
        );
        self.invitations.insert(invitation.id, invitation);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Invitation>, StoreError> {
        Ok(self.invitations.get(&id).map(|entry| entry.value().clone()))
    }

    async fn save_if_pending(&self, invitation: Invitation) -> Result<bool, StoreError> {
        // get_mut holds the shard lock, so the check and the write are atomic
        let mut entry = self
            .invitations
            .get_mut(&invitation.id)
            .ok_or(StoreError::InvitationNotFound(invitation.id))?;
        if !entry.value().is_pending() {
            debug!(
                invitation_id = %invitation.id,
                stored_status = %entry.value().status,
                "Conditional save skipped; record is no longer pending"
            );
            return Ok(false);
        }
        *entry.value_mut() = invitation;
        Ok(true)
    }

    async fn find_pending(
        &self,
        team_id: Uuid,
        invited_user_id: Uuid,
    ) -> Result<Option<Invitation>, StoreError> {
        Ok(self
            .invitations
            .iter()
            .find(|entry| {
                let inv = entry.value();
                inv.team_id == team_id && inv.invited_user_id == invited_user_id && inv.is_pending()
            })
            .map(|entry| entry.value().clone()))
    }

    async fn list_for_team(&self, team_id: Uuid) -> Result<Vec<Invitation>, StoreError> {
        let mut invitations: Vec<Invitation> = self
            .invitations
            .iter()
            .filter(|entry| entry.value().team_id == team_id)
            .map(|entry| entry.value().clone())
            .collect();
        invitations.sort_by_key(|inv| inv.created_at);
        Ok(invitations)
    }
}
