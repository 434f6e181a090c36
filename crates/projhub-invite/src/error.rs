//! Invitation workflow errors

use projhub_email::EmailError;
use projhub_store::StoreError;
use projhub_types::{InvitationStatus, TransitionError};
use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the invitation service
///
/// Store and dispatch failures propagate so the initiating UI action can
/// retry; in those cases the invitation record has not turned terminal.
#[derive(Debug, Error)]
pub enum InviteError {
    #[error("Invitation not found: {0}")]
    NotFound(Uuid),

    #[error("Invitation is already {0}")]
    AlreadyResolved(InvitationStatus),

    #[error("User {user_id} is already a member of team {team_id}")]
    AlreadyMember { team_id: Uuid, user_id: Uuid },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Email(#[from] EmailError),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}
