//! Team invitation workflow: state machine, progress simulation, service
//!
//! This crate owns the authoritative invitation lifecycle. An invitation is
//! created `Pending`, an email dispatch is simulated stage by stage
//! (sending, sent, delivered, opened, clicked) with each snapshot published
//! to the progress bus, and the invitation resolves exactly once to
//! accepted, rejected, cancelled, or expired. Acceptance mutates the team
//! roster through the injected [`projhub_store::TeamStore`] before the
//! record turns terminal, so a failed roster write leaves the invitation
//! retryable.

mod config;
mod error;
mod service;
mod tracker;

pub use config::InviteConfig;
pub use error::InviteError;
pub use service::{CompletionCallback, InvitationService};
pub use tracker::{ProgressTracker, Resolution, TrackingContext};
