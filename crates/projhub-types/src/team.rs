//! Team aggregate mutated by resolved invitations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamStatus {
    /// Still recruiting members
    Forming,
    /// Roster locked in, project underway
    Active,
    /// Project concluded
    Archived,
}

/// A project team with an ordered, duplicate-free roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    /// Team UUID (primary key)
    pub id: Uuid,

    /// Team name (human-readable)
    pub name: String,

    /// Display number assigned by admins, shown alongside the name
    pub number: Option<u32>,

    /// Member user ids in join order; no id appears twice
    pub members: Vec<Uuid>,

    /// User id of the team leader
    pub leader_id: Uuid,

    /// Current team status
    pub status: TeamStatus,

    /// When the team was created
    pub created_at: DateTime<Utc>,
}

impl Team {
    /// Create a forming team; the leader is its first member
    pub fn new(name: impl Into<String>, leader_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            number: None,
            members: vec![leader_id],
            leader_id,
            status: TeamStatus::Forming,
            created_at: Utc::now(),
        }
    }

    pub fn has_member(&self, user_id: Uuid) -> bool {
        self.members.contains(&user_id)
    }

    /// Append a member to the roster
    ///
    /// Idempotent: returns `false` and leaves the roster untouched when the
    /// user is already a member.
    pub fn add_member(&mut self, user_id: Uuid) -> bool {
        if self.has_member(user_id) {
            return false;
        }
        self.members.push(user_id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leader_is_first_member() {
        let leader = Uuid::new_v4();
        let team = Team::new("T-Alpha", leader);

        assert_eq!(team.members, vec![leader]);
        assert_eq!(team.leader_id, leader);
        assert_eq!(team.status, TeamStatus::Forming);
    }

    #[test]
    fn test_add_member_appends_in_order() {
        let leader = Uuid::new_v4();
        let mut team = Team::new("T-Alpha", leader);

        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        assert!(team.add_member(alice));
        assert!(team.add_member(bob));

        assert_eq!(team.members, vec![leader, alice, bob]);
    }

    #[test]
    fn test_add_member_is_idempotent() {
        let leader = Uuid::new_v4();
        let mut team = Team::new("T-Alpha", leader);

        let bob = Uuid::new_v4();
        assert!(team.add_member(bob));
        assert!(!team.add_member(bob));
        assert!(!team.add_member(leader));

        assert_eq!(team.members.len(), 2);
    }
}
