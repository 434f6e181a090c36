//! Invitation service: record lifecycle and roster mutation
//!
//! The service owns the authoritative state machine. Every operation loads
//! the record from the injected store, validates the transition, and only
//! then produces side effects. On acceptance the roster mutation is issued
//! first; the record turns terminal only after the store confirms it, so a
//! failed write leaves the invitation pending and retryable.

use crate::{InviteConfig, InviteError, ProgressTracker, Resolution, TrackingContext};
use projhub_email::{team_invitation_template, EmailDispatcher, TeamInvitationData};
use projhub_notify::{NotificationSink, ProgressBus};
use projhub_store::{InvitationStore, ProfileStore, TeamStore};
use projhub_types::{EmailStatus, Invitation, InvitationStatus, Team, UserProfile};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Observer of terminal invitation outcomes
pub type CompletionCallback = Arc<dyn Fn(Uuid, InvitationStatus) + Send + Sync>;

/// Coordinates invitations, delivery simulation, email dispatch, and the
/// team roster
pub struct InvitationService {
    config: InviteConfig,
    invitations: Arc<dyn InvitationStore>,
    teams: Arc<dyn TeamStore>,
    profiles: Arc<dyn ProfileStore>,
    dispatcher: Arc<dyn EmailDispatcher>,
    sink: Arc<dyn NotificationSink>,
    bus: Arc<ProgressBus>,
    tracker: ProgressTracker,
    completion_callbacks: Mutex<Vec<CompletionCallback>>,
}

impl InvitationService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: InviteConfig,
        invitations: Arc<dyn InvitationStore>,
        teams: Arc<dyn TeamStore>,
        profiles: Arc<dyn ProfileStore>,
        dispatcher: Arc<dyn EmailDispatcher>,
        sink: Arc<dyn NotificationSink>,
        bus: Arc<ProgressBus>,
    ) -> Arc<Self> {
        let tracker = ProgressTracker::new(bus.clone(), &config);
        let service = Arc::new(Self {
            config,
            invitations,
            teams,
            profiles,
            dispatcher,
            sink,
            bus,
            tracker,
            completion_callbacks: Mutex::new(Vec::new()),
        });

        // The tracker drives expiry; accepted/rejected outcomes already ran
        // through the service methods that triggered them.
        let weak = Arc::downgrade(&service);
        service.tracker.set_completion_handler(move |invitation_id, outcome| {
            if outcome != EmailStatus::Expired {
                return;
            }
            if let Some(service) = weak.upgrade() {
                tokio::spawn(async move {
                    if let Err(error) = service.expire(invitation_id).await {
                        warn!(
                            invitation_id = %invitation_id,
                            error = %error,
                            "Failed to mark invitation expired"
                        );
                    }
                });
            }
        });

        service
    }

    /// Progress bus observers subscribe through this
    pub fn bus(&self) -> &Arc<ProgressBus> {
        &self.bus
    }

    /// Tracker handle, mainly for consumers that unmount mid-simulation
    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    /// Register an observer of terminal outcomes
    pub fn on_completion<F>(&self, callback: F)
    where
        F: Fn(Uuid, InvitationStatus) + Send + Sync + 'static,
    {
        self.completion_callbacks
            .lock()
            .unwrap()
            .push(Arc::new(callback));
    }

    fn fire_completion(&self, invitation_id: Uuid, status: InvitationStatus) {
        let callbacks: Vec<CompletionCallback> = {
            self.completion_callbacks.lock().unwrap().clone()
        };
        for callback in callbacks {
            callback(invitation_id, status);
        }
    }

    /// Invite a user to a team
    ///
    /// Persists a pending record, dispatches the invitation email, and
    /// starts the delivery simulation. A previous pending invitation to the
    /// same recipient for this team is superseded (cancelled and its
    /// simulation stopped). A dispatch failure propagates and leaves the new
    /// record pending so the action can be retried.
    pub async fn create_invitation(
        &self,
        team_id: Uuid,
        invited_user_id: Uuid,
        invited_by_user_id: Uuid,
    ) -> Result<Invitation, InviteError> {
        let team = self.require_team(team_id).await?;
        let recipient = self.require_profile(invited_user_id).await?;
        let inviter = self.require_profile(invited_by_user_id).await?;

        if team.has_member(invited_user_id) {
            return Err(InviteError::AlreadyMember {
                team_id,
                user_id: invited_user_id,
            });
        }

        if let Some(mut previous) = self
            .invitations
            .find_pending(team_id, invited_user_id)
            .await?
        {
            info!(
                invitation_id = %previous.id,
                "Superseding previous pending invitation"
            );
            self.tracker.stop_tracking(previous.id);
            previous.transition(InvitationStatus::Cancelled)?;
            if !self.invitations.save_if_pending(previous.clone()).await? {
                debug!(
                    invitation_id = %previous.id,
                    "Previous invitation resolved before it could be superseded"
                );
            }
        }

        let invitation = Invitation::new(team_id, invited_user_id, invited_by_user_id);
        self.invitations.save(invitation.clone()).await?;

        let message = team_invitation_template(&TeamInvitationData {
            to_name: recipient.name.clone(),
            from_name: inviter.name.clone(),
            team_name: team.name.clone(),
            invitation_link: self.config.invitation_link(invitation.id),
        });
        self.dispatcher.send(&recipient.email, &message).await?;

        self.tracker.start_tracking(
            invitation.id,
            TrackingContext {
                team_name: team.name.clone(),
                team_number: team.number,
                recipient_name: recipient.name.clone(),
                recipient_email: recipient.email.clone(),
            },
        );

        info!(
            invitation_id = %invitation.id,
            team_id = %team_id,
            invited_user_id = %invited_user_id,
            "Created invitation"
        );
        Ok(invitation)
    }

    /// Accept an invitation on behalf of its recipient
    ///
    /// The roster mutation runs first; the record only becomes `Accepted`
    /// once the member append succeeded. The append itself is idempotent,
    /// so a duplicate acceptance can never add the member twice.
    pub async fn accept(&self, invitation_id: Uuid) -> Result<Invitation, InviteError> {
        let mut invitation = self.require_invitation(invitation_id).await?;
        ensure_pending(&invitation)?;

        let newly_added = self
            .teams
            .add_member(invitation.team_id, invitation.invited_user_id)
            .await?;
        if !newly_added {
            debug!(
                invitation_id = %invitation_id,
                "Recipient was already on the roster"
            );
        }

        invitation.transition(InvitationStatus::Accepted)?;
        let invitation = self.commit_terminal(invitation).await?;

        self.tracker.resolve(invitation_id, Resolution::Accepted);
        self.notify_acceptance(&invitation).await;
        self.fire_completion(invitation_id, InvitationStatus::Accepted);

        info!(invitation_id = %invitation_id, "Invitation accepted");
        Ok(invitation)
    }

    /// Reject an invitation on behalf of its recipient; the roster is
    /// untouched
    pub async fn reject(&self, invitation_id: Uuid) -> Result<Invitation, InviteError> {
        let mut invitation = self.require_invitation(invitation_id).await?;
        ensure_pending(&invitation)?;

        invitation.transition(InvitationStatus::Rejected)?;
        let invitation = self.commit_terminal(invitation).await?;

        self.tracker.resolve(invitation_id, Resolution::Rejected);
        self.fire_completion(invitation_id, InvitationStatus::Rejected);

        info!(invitation_id = %invitation_id, "Invitation rejected");
        Ok(invitation)
    }

    /// Withdraw a pending invitation (inviter or admin action)
    ///
    /// Stops the delivery simulation without publishing a terminal snapshot.
    pub async fn cancel(&self, invitation_id: Uuid) -> Result<Invitation, InviteError> {
        let mut invitation = self.require_invitation(invitation_id).await?;
        ensure_pending(&invitation)?;

        invitation.transition(InvitationStatus::Cancelled)?;
        let invitation = self.commit_terminal(invitation).await?;

        self.tracker.stop_tracking(invitation_id);
        self.fire_completion(invitation_id, InvitationStatus::Cancelled);

        info!(invitation_id = %invitation_id, "Invitation cancelled");
        Ok(invitation)
    }

    /// Mark an unanswered invitation expired
    ///
    /// Driven by the tracker timeout. Tolerates records that resolved in the
    /// meantime: expiry of a non-pending invitation is a no-op.
    pub async fn expire(&self, invitation_id: Uuid) -> Result<(), InviteError> {
        let Some(mut invitation) = self.invitations.get(invitation_id).await? else {
            warn!(invitation_id = %invitation_id, "Expiry for unknown invitation ignored");
            return Ok(());
        };
        if !invitation.is_pending() {
            debug!(
                invitation_id = %invitation_id,
                status = %invitation.status,
                "Invitation resolved before expiry fired"
            );
            return Ok(());
        }

        invitation.transition(InvitationStatus::Expired)?;
        if !self.invitations.save_if_pending(invitation).await? {
            debug!(
                invitation_id = %invitation_id,
                "Invitation resolved while expiry was being committed"
            );
            return Ok(());
        }

        self.fire_completion(invitation_id, InvitationStatus::Expired);
        info!(invitation_id = %invitation_id, "Invitation expired");
        Ok(())
    }

    async fn notify_acceptance(&self, invitation: &Invitation) {
        // Display names are best effort; the sink is fire-and-forget
        let member = self
            .profiles
            .get(invitation.invited_user_id)
            .await
            .ok()
            .flatten()
            .map(|profile| profile.name)
            .unwrap_or_else(|| invitation.invited_user_id.to_string());
        let team = self
            .teams
            .get(invitation.team_id)
            .await
            .ok()
            .flatten()
            .map(|team| team.name)
            .unwrap_or_else(|| invitation.team_id.to_string());

        self.sink
            .notify(
                "Invitation accepted",
                &format!("{} joined {}", member, team),
            )
            .await;
    }

    /// Commit a terminal transition, yielding to whichever resolution won
    ///
    /// The expiry timer commits from a spawned task, so the record may have
    /// turned terminal between this operation's load and its write. The
    /// conditional save keeps the first resolution; the loser reports the
    /// stored record's actual state.
    async fn commit_terminal(&self, invitation: Invitation) -> Result<Invitation, InviteError> {
        if self.invitations.save_if_pending(invitation.clone()).await? {
            return Ok(invitation);
        }
        let current = self.require_invitation(invitation.id).await?;
        Err(InviteError::AlreadyResolved(current.status))
    }

    async fn require_invitation(&self, id: Uuid) -> Result<Invitation, InviteError> {
        self.invitations
            .get(id)
            .await?
            .ok_or(InviteError::NotFound(id))
    }

    async fn require_team(&self, id: Uuid) -> Result<Team, InviteError> {
        self.teams
            .get(id)
            .await?
            .ok_or(InviteError::Store(projhub_store::StoreError::TeamNotFound(id)))
    }

    async fn require_profile(&self, id: Uuid) -> Result<UserProfile, InviteError> {
        self.profiles
            .get(id)
            .await?
            .ok_or(InviteError::Store(projhub_store::StoreError::ProfileNotFound(id)))
    }
}

fn ensure_pending(invitation: &Invitation) -> Result<(), InviteError> {
    if invitation.is_pending() {
        Ok(())
    } else {
        Err(InviteError::AlreadyResolved(invitation.status))
    }
}
