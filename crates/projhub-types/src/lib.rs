//! Core domain types for the projhub portal
//!
//! This crate defines the shared vocabulary of the invitation workflow:
//! invitations and their status lifecycle, email delivery progress snapshots,
//! teams, user profiles, and the role-to-dashboard mapping. It carries no
//! runtime behavior beyond the invariants the types themselves enforce
//! (status transitions, member uniqueness, progress monotonicity hints).

mod dashboard;
mod invitation;
mod progress;
mod project;
mod team;
mod user;

pub use dashboard::{dashboard_for, DashboardView};
pub use invitation::{Invitation, InvitationStatus, TransitionError};
pub use progress::{EmailProgress, EmailStatus};
pub use project::Project;
pub use team::{Team, TeamStatus};
pub use user::{Role, UserProfile};
