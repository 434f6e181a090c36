//! Per-invitation delivery progress simulation
//!
//! One background task per tracked invitation walks the ordered delivery
//! stages on a fixed delay, publishing each snapshot to the progress bus,
//! then halts awaiting an external resolution or the expiry timeout. Tasks
//! are tracked by invitation id so they can be aborted when the invitation
//! is cancelled or the tracker shuts down; unsubscribing an observer never
//! stops the simulation for the others.

use crate::InviteConfig;
use projhub_notify::ProgressBus;
use projhub_types::{EmailProgress, EmailStatus};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock, Weak};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

/// Called once per simulation with its terminal stage
pub type CompletionHandler = Arc<dyn Fn(Uuid, EmailStatus) + Send + Sync>;

/// Display context threaded into progress messages
#[derive(Debug, Clone)]
pub struct TrackingContext {
    pub team_name: String,
    pub team_number: Option<u32>,
    pub recipient_name: String,
    pub recipient_email: String,
}

/// External resolution of a tracked invitation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Accepted,
    Rejected,
}

struct ActiveSimulation {
    handle: JoinHandle<()>,
    /// Consumed by the first resolution; later resolutions are ignored
    resolve_tx: Option<oneshot::Sender<Resolution>>,
}

/// Tracks simulated delivery pipelines, one per invitation
#[derive(Clone)]
pub struct ProgressTracker {
    inner: Arc<TrackerInner>,
}

struct TrackerInner {
    bus: Arc<ProgressBus>,
    step_delay: Duration,
    expiry_window: Duration,
    active: Mutex<HashMap<Uuid, ActiveSimulation>>,
    on_complete: RwLock<Option<CompletionHandler>>,
}

impl ProgressTracker {
    pub fn new(bus: Arc<ProgressBus>, config: &InviteConfig) -> Self {
        Self {
            inner: Arc::new(TrackerInner {
                bus,
                step_delay: config.step_delay,
                expiry_window: config.expiry_window,
                active: Mutex::new(HashMap::new()),
                on_complete: RwLock::new(None),
            }),
        }
    }

    /// Install the handler invoked when a simulation reaches a terminal stage
    pub fn set_completion_handler<F>(&self, handler: F)
    where
        F: Fn(Uuid, EmailStatus) + Send + Sync + 'static,
    {
        *self.inner.on_complete.write().unwrap() = Some(Arc::new(handler));
    }

    /// Begin the simulated progression for an invitation
    ///
    /// Idempotent: a second start for an id that is already tracked is a
    /// no-op, the running simulation keeps its original context.
    pub fn start_tracking(&self, invitation_id: Uuid, ctx: TrackingContext) {
        let mut active = self.inner.active.lock().unwrap();
        if active.contains_key(&invitation_id) {
            debug!(invitation_id = %invitation_id, "Tracking already active, ignoring start");
            return;
        }

        debug!(
            invitation_id = %invitation_id,
            recipient = %ctx.recipient_email,
            team = %ctx.team_name,
            "Starting delivery simulation"
        );

        let (resolve_tx, resolve_rx) = oneshot::channel();
        let inner = Arc::downgrade(&self.inner);
        let handle = tokio::spawn(run_simulation(inner, invitation_id, ctx, resolve_rx));

        active.insert(
            invitation_id,
            ActiveSimulation {
                handle,
                resolve_tx: Some(resolve_tx),
            },
        );
    }

    /// Resolve a tracked invitation as accepted or rejected
    ///
    /// Resolutions addressed to an unknown or already-resolved invitation
    /// are ignored with a warning, not an error.
    pub fn resolve(&self, invitation_id: Uuid, resolution: Resolution) {
        let tx = {
            let mut active = self.inner.active.lock().unwrap();
            active
                .get_mut(&invitation_id)
                .and_then(|sim| sim.resolve_tx.take())
        };

        match tx {
            Some(tx) => {
                if tx.send(resolution).is_err() {
                    warn!(
                        invitation_id = %invitation_id,
                        "Simulation ended before the resolution was delivered"
                    );
                }
            }
            None => {
                warn!(
                    invitation_id = %invitation_id,
                    "Resolution for unknown or inactive invitation ignored"
                );
            }
        }
    }

    /// Abort the simulation for an invitation, if one is running
    ///
    /// Used when an invitation is cancelled or a consumer shuts the
    /// workflow down; no terminal snapshot is published.
    pub fn stop_tracking(&self, invitation_id: Uuid) {
        let removed = self.inner.active.lock().unwrap().remove(&invitation_id);
        if let Some(sim) = removed {
            sim.handle.abort();
            debug!(invitation_id = %invitation_id, "Stopped delivery simulation");
        }
    }

    /// Whether a simulation is currently running for this invitation
    pub fn is_tracking(&self, invitation_id: Uuid) -> bool {
        self.inner.active.lock().unwrap().contains_key(&invitation_id)
    }

    /// Number of simulations currently running
    pub fn active_count(&self) -> usize {
        self.inner.active.lock().unwrap().len()
    }
}

async fn run_simulation(
    inner: Weak<TrackerInner>,
    invitation_id: Uuid,
    ctx: TrackingContext,
    mut resolve_rx: oneshot::Receiver<Resolution>,
) {
    let (bus, step_delay, expiry_window) = match inner.upgrade() {
        Some(tracker) => (tracker.bus.clone(), tracker.step_delay, tracker.expiry_window),
        None => return,
    };

    let expiry = tokio::time::sleep(expiry_window);
    tokio::pin!(expiry);

    let mut last_progress = 0u8;
    let mut outcome = None;

    for stage in EmailStatus::DELIVERY_SEQUENCE {
        tokio::select! {
            _ = tokio::time::sleep(step_delay) => {
                // Progress never decreases within one simulation
                let progress = last_progress.max(stage.progress_hint());
                let snapshot = EmailProgress::with_progress(
                    invitation_id,
                    stage,
                    progress,
                    message_for(stage, last_progress, &ctx),
                );
                last_progress = snapshot.progress;
                bus.publish(invitation_id, &snapshot);
            }
            res = &mut resolve_rx => {
                outcome = Some(resolution_outcome(res));
                break;
            }
            _ = &mut expiry => {
                outcome = Some(Some(EmailStatus::Expired));
                break;
            }
        }
    }

    // Pipeline done (or interrupted); await resolution or expiry
    let outcome = match outcome {
        Some(outcome) => outcome,
        None => {
            tokio::select! {
                res = &mut resolve_rx => resolution_outcome(res),
                _ = &mut expiry => Some(EmailStatus::Expired),
            }
        }
    };

    let Some(terminal) = outcome else {
        // Tracker went away without resolving; nothing left to report
        cleanup(&inner, invitation_id);
        return;
    };

    // Expiry freezes the percentage where the pipeline stopped
    let progress = match terminal {
        EmailStatus::Expired => last_progress,
        _ => 100,
    };
    let snapshot = EmailProgress::with_progress(
        invitation_id,
        terminal,
        progress,
        message_for(terminal, last_progress, &ctx),
    );
    bus.publish(invitation_id, &snapshot);

    debug!(
        invitation_id = %invitation_id,
        outcome = %terminal,
        "Delivery simulation finished"
    );

    cleanup(&inner, invitation_id);
    if let Some(tracker) = inner.upgrade() {
        let handler = tracker.on_complete.read().unwrap().clone();
        if let Some(handler) = handler {
            handler(invitation_id, terminal);
        }
    }
}

fn cleanup(inner: &Weak<TrackerInner>, invitation_id: Uuid) {
    if let Some(tracker) = inner.upgrade() {
        tracker.active.lock().unwrap().remove(&invitation_id);
    }
}

fn resolution_outcome(
    res: Result<Resolution, oneshot::error::RecvError>,
) -> Option<EmailStatus> {
    match res {
        Ok(Resolution::Accepted) => Some(EmailStatus::Accepted),
        Ok(Resolution::Rejected) => Some(EmailStatus::Rejected),
        // Sender dropped without resolving: the tracker is shutting down
        Err(_) => None,
    }
}

fn message_for(stage: EmailStatus, last_progress: u8, ctx: &TrackingContext) -> String {
    let team = match ctx.team_number {
        Some(number) => format!("{} (Team {})", ctx.team_name, number),
        None => ctx.team_name.clone(),
    };
    match stage {
        EmailStatus::Sending => format!(
            "Sending invitation for {} to {} <{}>",
            team, ctx.recipient_name, ctx.recipient_email
        ),
        EmailStatus::Sent => format!("Invitation for {} handed to the mail relay", team),
        EmailStatus::Delivered => format!("Delivered to {}", ctx.recipient_email),
        EmailStatus::Opened => format!("{} opened the invitation", ctx.recipient_name),
        EmailStatus::Clicked => format!("{} clicked the invitation link", ctx.recipient_name),
        EmailStatus::Accepted => format!("{} accepted the invitation to {}", ctx.recipient_name, team),
        EmailStatus::Rejected => format!("{} declined the invitation to {}", ctx.recipient_name, team),
        EmailStatus::Expired => format!(
            "Invitation to {} expired without a response at {}%",
            ctx.recipient_name, last_progress
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_config(step_ms: u64, expiry_ms: u64) -> InviteConfig {
        InviteConfig {
            step_delay: Duration::from_millis(step_ms),
            expiry_window: Duration::from_millis(expiry_ms),
            ..InviteConfig::default()
        }
    }

    fn ctx() -> TrackingContext {
        TrackingContext {
            team_name: "T-Alpha".to_string(),
            team_number: Some(7),
            recipient_name: "Bob".to_string(),
            recipient_email: "bob@x.edu".to_string(),
        }
    }

    fn collect(bus: &Arc<ProgressBus>, id: Uuid) -> Arc<Mutex<Vec<EmailProgress>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        // Subscription intentionally leaked for the test's lifetime
        std::mem::forget(bus.subscribe(id, move |progress| {
            sink.lock().unwrap().push(progress.clone());
        }));
        log
    }

    #[tokio::test(start_paused = true)]
    async fn test_pipeline_publishes_stages_in_order() {
        let bus = Arc::new(ProgressBus::new());
        let tracker = ProgressTracker::new(bus.clone(), &test_config(10, 10_000));
        let id = Uuid::new_v4();
        let log = collect(&bus, id);

        tracker.start_tracking(id, ctx());
        tokio::time::sleep(Duration::from_millis(100)).await;

        let snapshots = log.lock().unwrap();
        let statuses: Vec<EmailStatus> = snapshots.iter().map(|s| s.status).collect();
        assert_eq!(statuses, EmailStatus::DELIVERY_SEQUENCE.to_vec());

        let mut last = 0;
        for snapshot in snapshots.iter() {
            assert!(snapshot.progress >= last, "progress must not decrease");
            last = snapshot.progress;
        }
        assert!(last < 100, "pipeline alone never reaches 100");
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_tracking_is_idempotent() {
        let bus = Arc::new(ProgressBus::new());
        let tracker = ProgressTracker::new(bus.clone(), &test_config(10, 10_000));
        let id = Uuid::new_v4();
        let log = collect(&bus, id);

        tracker.start_tracking(id, ctx());
        tracker.start_tracking(id, ctx());
        assert_eq!(tracker.active_count(), 1);

        tokio::time::sleep(Duration::from_millis(100)).await;

        // One simulation, one set of stage snapshots
        assert_eq!(log.lock().unwrap().len(), EmailStatus::DELIVERY_SEQUENCE.len());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolution_publishes_terminal_snapshot() {
        let bus = Arc::new(ProgressBus::new());
        let tracker = ProgressTracker::new(bus.clone(), &test_config(10, 10_000));
        let id = Uuid::new_v4();
        let log = collect(&bus, id);

        let completed = Arc::new(Mutex::new(Vec::new()));
        let completed_inner = completed.clone();
        tracker.set_completion_handler(move |id, status| {
            completed_inner.lock().unwrap().push((id, status));
        });

        tracker.start_tracking(id, ctx());
        tokio::time::sleep(Duration::from_millis(100)).await;

        tracker.resolve(id, Resolution::Accepted);
        tokio::time::sleep(Duration::from_millis(10)).await;

        let snapshots = log.lock().unwrap();
        let last = snapshots.last().unwrap();
        assert_eq!(last.status, EmailStatus::Accepted);
        assert_eq!(last.progress, 100);

        assert_eq!(*completed.lock().unwrap(), vec![(id, EmailStatus::Accepted)]);
        assert!(!tracker.is_tracking(id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_early_resolution_short_circuits_pipeline() {
        let bus = Arc::new(ProgressBus::new());
        let tracker = ProgressTracker::new(bus.clone(), &test_config(10_000, 100_000));
        let id = Uuid::new_v4();
        let log = collect(&bus, id);

        tracker.start_tracking(id, ctx());
        // Resolve before the first stage delay elapses
        tracker.resolve(id, Resolution::Rejected);
        tokio::time::sleep(Duration::from_millis(10)).await;

        let snapshots = log.lock().unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].status, EmailStatus::Rejected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_freezes_progress() {
        let bus = Arc::new(ProgressBus::new());
        // Pipeline completes, then the invitation sits unanswered
        let tracker = ProgressTracker::new(bus.clone(), &test_config(10, 200));
        let id = Uuid::new_v4();
        let log = collect(&bus, id);

        tracker.start_tracking(id, ctx());
        tokio::time::sleep(Duration::from_millis(400)).await;

        let snapshots = log.lock().unwrap();
        let last = snapshots.last().unwrap();
        assert_eq!(last.status, EmailStatus::Expired);

        // Frozen at the clicked percentage, not bumped to 100
        let clicked = EmailStatus::Clicked.progress_hint();
        assert_eq!(last.progress, clicked);
        assert!(!tracker.is_tracking(id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolution_after_expiry_is_ignored() {
        let bus = Arc::new(ProgressBus::new());
        let tracker = ProgressTracker::new(bus.clone(), &test_config(10, 100));
        let id = Uuid::new_v4();
        let log = collect(&bus, id);

        tracker.start_tracking(id, ctx());
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(log.lock().unwrap().last().unwrap().status, EmailStatus::Expired);

        let count_before = log.lock().unwrap().len();
        tracker.resolve(id, Resolution::Accepted);
        tokio::time::sleep(Duration::from_millis(50)).await;

        // Nothing further published, no state change
        assert_eq!(log.lock().unwrap().len(), count_before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolve_unknown_id_is_ignored() {
        let bus = Arc::new(ProgressBus::new());
        let tracker = ProgressTracker::new(bus, &test_config(10, 1_000));
        // Must not panic or create any tracking state
        tracker.resolve(Uuid::new_v4(), Resolution::Accepted);
        assert_eq!(tracker.active_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_tracking_aborts_simulation() {
        let bus = Arc::new(ProgressBus::new());
        let tracker = ProgressTracker::new(bus.clone(), &test_config(100, 10_000));
        let id = Uuid::new_v4();
        let log = collect(&bus, id);

        tracker.start_tracking(id, ctx());
        assert!(tracker.is_tracking(id));

        tracker.stop_tracking(id);
        assert!(!tracker.is_tracking(id));

        tokio::time::sleep(Duration::from_millis(1_000)).await;
        // Aborted before any stage fired; no snapshots, no terminal
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_independent_invitations_do_not_interfere() {
        let bus = Arc::new(ProgressBus::new());
        let tracker = ProgressTracker::new(bus.clone(), &test_config(10, 10_000));
        let id_a = Uuid::new_v4();
        let id_b = Uuid::new_v4();
        let log_a = collect(&bus, id_a);
        let log_b = collect(&bus, id_b);

        tracker.start_tracking(id_a, ctx());
        tracker.start_tracking(id_b, ctx());
        tokio::time::sleep(Duration::from_millis(100)).await;

        tracker.resolve(id_a, Resolution::Accepted);
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(
            log_a.lock().unwrap().last().unwrap().status,
            EmailStatus::Accepted
        );
        // B is still awaiting a response
        assert_eq!(
            log_b.lock().unwrap().last().unwrap().status,
            EmailStatus::Clicked
        );
        assert!(tracker.is_tracking(id_b));
    }
}
