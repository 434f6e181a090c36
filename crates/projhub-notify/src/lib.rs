//! In-process notification plumbing for the invitation workflow
//!
//! Two pieces live here:
//! - [`ProgressBus`], a per-invitation publish/subscribe registry that fans
//!   delivery-progress snapshots out to UI observers, and
//! - [`NotificationSink`], the fire-and-forget capability the workflow uses
//!   to surface user-facing alerts (desktop notification, toast, or a real
//!   transactional channel in production).

mod bus;
mod sink;

pub use bus::{ProgressBus, Subscription};
pub use sink::{LogNotificationSink, NotificationSink};
