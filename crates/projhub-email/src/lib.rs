//! Email rendering and dispatch for the portal
//!
//! Templates are rendered by plain string interpolation into a
//! subject/HTML/plain-text triple. Dispatch goes through the
//! [`EmailDispatcher`] trait; the bundled [`StubDispatcher`] resolves after a
//! fixed simulated latency and always succeeds. A real deployment swaps in a
//! transactional provider behind the same trait without changing callers.

mod dispatch;
mod templates;

pub use dispatch::{DispatchReceipt, EmailDispatcher, EmailError, StubDispatcher};
pub use templates::{
    feedback_notification_template, schedule_notification_template, team_invitation_template,
    welcome_template, EmailMessage, FeedbackNotificationData, ScheduleNotificationData,
    TeamInvitationData, WelcomeData,
};
