//! Portal assembly
//!
//! Wires the invitation workflow against pluggable collaborators. Every
//! seam defaults to the in-process implementation (in-memory stores, stub
//! dispatcher, log sink); production frontends swap in their own stores and
//! a real email provider through the builder.

use projhub_email::{EmailDispatcher, StubDispatcher};
use projhub_invite::{InvitationService, InviteConfig};
use projhub_notify::{LogNotificationSink, NotificationSink, ProgressBus};
use projhub_store::{
    InMemoryInvitationStore, InMemoryProfileStore, InMemoryProjectStore, InMemoryTeamStore,
    InvitationStore, ProfileStore, ProjectStore, TeamStore,
};
use std::sync::Arc;

/// Assembled portal core
pub struct Portal {
    invitations: Arc<InvitationService>,
    teams: Arc<dyn TeamStore>,
    profiles: Arc<dyn ProfileStore>,
    projects: Arc<dyn ProjectStore>,
    bus: Arc<ProgressBus>,
}

impl Portal {
    pub fn builder() -> PortalBuilder {
        PortalBuilder::default()
    }

    /// The invitation workflow service
    pub fn invitations(&self) -> &Arc<InvitationService> {
        &self.invitations
    }

    pub fn teams(&self) -> &Arc<dyn TeamStore> {
        &self.teams
    }

    pub fn profiles(&self) -> &Arc<dyn ProfileStore> {
        &self.profiles
    }

    pub fn projects(&self) -> &Arc<dyn ProjectStore> {
        &self.projects
    }

    /// Progress bus for UI observers
    pub fn bus(&self) -> &Arc<ProgressBus> {
        &self.bus
    }
}

/// Builder for [`Portal`] with pluggable collaborators
#[derive(Default)]
pub struct PortalBuilder {
    config: Option<InviteConfig>,
    invitations: Option<Arc<dyn InvitationStore>>,
    teams: Option<Arc<dyn TeamStore>>,
    profiles: Option<Arc<dyn ProfileStore>>,
    projects: Option<Arc<dyn ProjectStore>>,
    dispatcher: Option<Arc<dyn EmailDispatcher>>,
    sink: Option<Arc<dyn NotificationSink>>,
}

impl PortalBuilder {
    pub fn with_config(mut self, config: InviteConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_invitation_store(mut self, store: Arc<dyn InvitationStore>) -> Self {
        self.invitations = Some(store);
        self
    }

    pub fn with_team_store(mut self, store: Arc<dyn TeamStore>) -> Self {
        self.teams = Some(store);
        self
    }

    pub fn with_profile_store(mut self, store: Arc<dyn ProfileStore>) -> Self {
        self.profiles = Some(store);
        self
    }

    pub fn with_project_store(mut self, store: Arc<dyn ProjectStore>) -> Self {
        self.projects = Some(store);
        self
    }

    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn EmailDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn with_notification_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn build(self) -> Portal {
        let config = self.config.unwrap_or_default();
        let invitations = self
            .invitations
            .unwrap_or_else(|| Arc::new(InMemoryInvitationStore::new()));
        let teams = self
            .teams
            .unwrap_or_else(|| Arc::new(InMemoryTeamStore::new()));
        let profiles = self
            .profiles
            .unwrap_or_else(|| Arc::new(InMemoryProfileStore::new()));
        let projects = self
            .projects
            .unwrap_or_else(|| Arc::new(InMemoryProjectStore::new()));
        let dispatcher = self
            .dispatcher
            .unwrap_or_else(|| Arc::new(StubDispatcher::new()));
        let sink = self.sink.unwrap_or_else(|| Arc::new(LogNotificationSink));
        let bus = Arc::new(ProgressBus::new());

        let service = InvitationService::new(
            config,
            invitations,
            teams.clone(),
            profiles.clone(),
            dispatcher,
            sink,
            bus.clone(),
        );

        Portal {
            invitations: service,
            teams,
            profiles,
            projects,
            bus,
        }
    }
}
