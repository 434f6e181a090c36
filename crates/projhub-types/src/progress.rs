//! Email delivery progress snapshots
//!
//! The progress tracker publishes one `EmailProgress` per stage change. The
//! delivery stages are ordered; `progress` carries a 0-100 percentage that
//! never decreases for a given invitation while the pipeline is live.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stage of the simulated email delivery pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailStatus {
    Sending,
    Sent,
    Delivered,
    Opened,
    Clicked,
    Accepted,
    Rejected,
    Expired,
}

impl EmailStatus {
    /// Delivery stages in pipeline order, before any resolution
    pub const DELIVERY_SEQUENCE: [EmailStatus; 5] = [
        EmailStatus::Sending,
        EmailStatus::Sent,
        EmailStatus::Delivered,
        EmailStatus::Opened,
        EmailStatus::Clicked,
    ];

    /// Default progress percentage for this stage
    ///
    /// `Expired` has no percentage of its own: it freezes whatever value the
    /// pipeline had reached, which the tracker supplies explicitly.
    pub fn progress_hint(&self) -> u8 {
        match self {
            EmailStatus::Sending => 10,
            EmailStatus::Sent => 25,
            EmailStatus::Delivered => 50,
            EmailStatus::Opened => 70,
            EmailStatus::Clicked => 85,
            EmailStatus::Accepted | EmailStatus::Rejected => 100,
            EmailStatus::Expired => 0,
        }
    }

    /// Whether this stage ends the simulation
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EmailStatus::Accepted | EmailStatus::Rejected | EmailStatus::Expired
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EmailStatus::Sending => "sending",
            EmailStatus::Sent => "sent",
            EmailStatus::Delivered => "delivered",
            EmailStatus::Opened => "opened",
            EmailStatus::Clicked => "clicked",
            EmailStatus::Accepted => "accepted",
            EmailStatus::Rejected => "rejected",
            EmailStatus::Expired => "expired",
        }
    }
}

impl fmt::Display for EmailStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observable snapshot of an invitation's delivery pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailProgress {
    /// Invitation this snapshot belongs to
    pub invitation_id: Uuid,

    /// Current pipeline stage
    pub status: EmailStatus,

    /// Percentage 0-100; non-decreasing per invitation until `Expired`
    pub progress: u8,

    /// Human-readable description of the stage
    pub message: String,

    /// When this snapshot was produced
    pub timestamp: DateTime<Utc>,
}

impl EmailProgress {
    /// Snapshot at a stage's default percentage
    pub fn new(invitation_id: Uuid, status: EmailStatus, message: impl Into<String>) -> Self {
        Self {
            invitation_id,
            status,
            progress: status.progress_hint(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    /// Snapshot with an explicit percentage (used for `Expired`, which
    /// freezes the last value the pipeline reached)
    pub fn with_progress(
        invitation_id: Uuid,
        status: EmailStatus,
        progress: u8,
        message: impl Into<String>,
    ) -> Self {
        Self {
            invitation_id,
            status,
            progress: progress.min(100),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}
