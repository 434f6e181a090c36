//! Projhub Library - Public API for the academic-project portal core
//!
//! This library re-exports the portal crates and provides [`Portal`], a
//! unified entry point that wires the invitation workflow together: record
//! store, team roster, profiles, delivery simulation, progress bus, email
//! dispatch, and user notifications.
//!
//! # Quick Start
//!
//! ```ignore
//! use projhub_lib::{Portal, Role, Team, UserProfile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let portal = Portal::builder().build();
//!
//!     // Seed collaborators (in production these are the external stores)
//!     let alice = UserProfile::new("alice@x.edu", "Alice", Role::Student);
//!     let bob = UserProfile::new("bob@x.edu", "Bob", Role::Student);
//!     let team = Team::new("T-Alpha", alice.id);
//!     let (team_id, alice_id, bob_id) = (team.id, alice.id, bob.id);
//!     portal.profiles().save(alice).await?;
//!     portal.profiles().save(bob).await?;
//!     portal.teams().save(team).await?;
//!
//!     // Invite, observe progress, accept
//!     let invitation = portal
//!         .invitations()
//!         .create_invitation(team_id, bob_id, alice_id)
//!         .await?;
//!     let subscription = portal.bus().subscribe(invitation.id, |progress| {
//!         println!("{}% {}", progress.progress, progress.message);
//!     });
//!     portal.invitations().accept(invitation.id).await?;
//!     subscription.unsubscribe();
//!     Ok(())
//! }
//! ```

mod portal;

pub use portal::{Portal, PortalBuilder};

// Domain types
pub use projhub_types::{
    dashboard_for, DashboardView, EmailProgress, EmailStatus, Invitation, InvitationStatus,
    Project, Role, Team, TeamStatus, TransitionError, UserProfile,
};

// Stores
pub use projhub_store::{
    InMemoryInvitationStore, InMemoryProfileStore, InMemoryProjectStore, InMemoryTeamStore,
    InvitationStore, ProfileStore, ProjectStore, StoreError, TeamStore,
};

// Notification plumbing
pub use projhub_notify::{LogNotificationSink, NotificationSink, ProgressBus, Subscription};

// Email rendering and dispatch
pub use projhub_email::{
    feedback_notification_template, schedule_notification_template, team_invitation_template,
    welcome_template, DispatchReceipt, EmailDispatcher, EmailError, EmailMessage,
    FeedbackNotificationData, ScheduleNotificationData, StubDispatcher, TeamInvitationData,
    WelcomeData,
};

// Invitation workflow
pub use projhub_invite::{
    InvitationService, InviteConfig, InviteError, ProgressTracker, Resolution, TrackingContext,
};
