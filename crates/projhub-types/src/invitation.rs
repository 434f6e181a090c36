//! Invitation entity and its status state machine
//!
//! The lifecycle is deliberately small: an invitation starts `Pending` and
//! moves exactly once into one of four terminal states. Each terminal state
//! records its own timestamp, and no transition is defined out of a terminal
//! state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Status of a team invitation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    /// Awaiting a response from the invited user
    Pending,
    /// Recipient accepted; terminal
    Accepted,
    /// Recipient rejected; terminal
    Rejected,
    /// Inviter or admin withdrew the invitation; terminal
    Cancelled,
    /// No response within the expiry window; terminal
    Expired,
}

impl InvitationStatus {
    /// Whether this status admits no further transitions
    pub fn is_terminal(&self) -> bool {
        !matches!(self, InvitationStatus::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Rejected => "rejected",
            InvitationStatus::Cancelled => "cancelled",
            InvitationStatus::Expired => "expired",
        }
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invitation state machine errors
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("invitation is already {current}, cannot transition to {requested}")]
    AlreadyTerminal {
        current: InvitationStatus,
        requested: InvitationStatus,
    },

    #[error("{requested} is not a valid transition target")]
    InvalidTarget { requested: InvitationStatus },
}

/// A request for a user to join a team
///
/// Exactly one terminal timestamp field is set once the status leaves
/// `Pending`; which one is determined by the terminal status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    /// Invitation UUID (primary key)
    pub id: Uuid,

    /// Team the recipient is invited to join
    pub team_id: Uuid,

    /// User being invited
    pub invited_user_id: Uuid,

    /// User who issued the invitation
    pub invited_by_user_id: Uuid,

    /// Current lifecycle status
    pub status: InvitationStatus,

    /// When the invitation was created
    pub created_at: DateTime<Utc>,

    /// Set when the recipient accepts
    pub accepted_at: Option<DateTime<Utc>>,

    /// Set when the recipient rejects
    pub rejected_at: Option<DateTime<Utc>>,

    /// Set when the inviter/admin cancels
    pub cancelled_at: Option<DateTime<Utc>>,

    /// Set when the expiry window elapses without a response
    pub expired_at: Option<DateTime<Utc>>,
}

impl Invitation {
    /// Create a new pending invitation
    pub fn new(team_id: Uuid, invited_user_id: Uuid, invited_by_user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_id,
            invited_user_id,
            invited_by_user_id,
            status: InvitationStatus::Pending,
            created_at: Utc::now(),
            accepted_at: None,
            rejected_at: None,
            cancelled_at: None,
            expired_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == InvitationStatus::Pending
    }

    /// Move the invitation into a terminal state
    ///
    /// The only legal transitions are `Pending` -> one of the four terminal
    /// states. The matching terminal timestamp is set; the other three stay
    /// `None`.
    pub fn transition(&mut self, next: InvitationStatus) -> Result<(), TransitionError> {
        if self.status.is_terminal() {
            return Err(TransitionError::AlreadyTerminal {
                current: self.status,
                requested: next,
            });
        }

        let now = Utc::now();
        match next {
            InvitationStatus::Accepted => self.accepted_at = Some(now),
            InvitationStatus::Rejected => self.rejected_at = Some(now),
            InvitationStatus::Cancelled => self.cancelled_at = Some(now),
            InvitationStatus::Expired => self.expired_at = Some(now),
            InvitationStatus::Pending => {
                return Err(TransitionError::InvalidTarget { requested: next })
            }
        }

        self.status = next;
        Ok(())
    }

    /// Timestamp of the terminal transition, if one happened
    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.accepted_at
            .or(self.rejected_at)
            .or(self.cancelled_at)
            .or(self.expired_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_invitation() -> Invitation {
        Invitation::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
    }

    #[test]
    fn test_new_invitation_is_pending() {
        let inv = pending_invitation();
        assert_eq!(inv.status, InvitationStatus::Pending);
        assert!(inv.is_pending());
        assert!(inv.resolved_at().is_none());
    }

    #[test]
    fn test_accept_sets_exactly_one_timestamp() {
        let mut inv = pending_invitation();
        inv.transition(InvitationStatus::Accepted).unwrap();

        assert_eq!(inv.status, InvitationStatus::Accepted);
        assert!(inv.accepted_at.is_some());
        assert!(inv.rejected_at.is_none());
        assert!(inv.cancelled_at.is_none());
        assert!(inv.expired_at.is_none());
        assert_eq!(inv.resolved_at(), inv.accepted_at);
    }

    #[test]
    fn test_each_terminal_state_sets_its_own_timestamp() {
        let mut rejected = pending_invitation();
        rejected.transition(InvitationStatus::Rejected).unwrap();
        assert!(rejected.rejected_at.is_some());
        assert!(rejected.accepted_at.is_none());

        let mut cancelled = pending_invitation();
        cancelled.transition(InvitationStatus::Cancelled).unwrap();
        assert!(cancelled.cancelled_at.is_some());
        assert!(cancelled.rejected_at.is_none());

        let mut expired = pending_invitation();
        expired.transition(InvitationStatus::Expired).unwrap();
        assert!(expired.expired_at.is_some());
        assert!(expired.cancelled_at.is_none());
    }

    #[test]
    fn test_no_transition_out_of_terminal_state() {
        let mut inv = pending_invitation();
        inv.transition(InvitationStatus::Rejected).unwrap();

        let result = inv.transition(InvitationStatus::Accepted);
        assert!(matches!(
            result,
            Err(TransitionError::AlreadyTerminal {
                current: InvitationStatus::Rejected,
                requested: InvitationStatus::Accepted,
            })
        ));

        // State and timestamps are untouched by the failed transition
        assert_eq!(inv.status, InvitationStatus::Rejected);
        assert!(inv.accepted_at.is_none());
    }

    #[test]
    fn test_pending_is_not_a_transition_target() {
        let mut inv = pending_invitation();
        let result = inv.transition(InvitationStatus::Pending);
        assert!(matches!(
            result,
            Err(TransitionError::InvalidTarget { .. })
        ));
        assert!(inv.is_pending());
    }

    #[test]
    fn test_status_serde_round_trip() {
        let json = serde_json::to_string(&InvitationStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");

        let status: InvitationStatus = serde_json::from_str("\"expired\"").unwrap();
        assert_eq!(status, InvitationStatus::Expired);
    }
}
