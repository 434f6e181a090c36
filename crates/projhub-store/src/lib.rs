//! Pluggable repositories for portal aggregates
//!
//! The source system kept its records in an ambient, module-level store.
//! Here every aggregate lives behind an injected trait with explicit get/put
//! operations, so the invitation workflow can run against in-memory stores
//! in tests and a real document store in production. Default implementations
//! are in-memory; all data is lost on restart.

mod invitations;
mod profiles;
mod projects;
mod teams;

pub use invitations::{InMemoryInvitationStore, InvitationStore};
pub use profiles::{InMemoryProfileStore, ProfileStore};
pub use projects::{InMemoryProjectStore, ProjectStore};
pub use teams::{InMemoryTeamStore, TeamStore};

use thiserror::Error;

/// Errors that can occur in store implementations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Team not found: {0}")]
    TeamNotFound(uuid::Uuid),

    #[error("Invitation not found: {0}")]
    InvitationNotFound(uuid::Uuid),

    #[error("Profile not found: {0}")]
    ProfileNotFound(uuid::Uuid),
}
