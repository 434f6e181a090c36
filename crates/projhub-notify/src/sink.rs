//! Fire-and-forget user notification sink
//!
//! The workflow reports noteworthy events (invitation accepted, feedback
//! posted, schedule published) through this capability. Delivery is not
//! acknowledged and no result feeds back into the invitation state machine.

use tracing::info;

/// Capability for pushing a user-facing alert
///
/// Production implementations bridge to a desktop/browser notification API
/// or a transactional channel; the default just logs.
#[async_trait::async_trait]
pub trait NotificationSink: Send + Sync {
    /// Push one alert; errors are not surfaced to callers
    async fn notify(&self, title: &str, body: &str);
}

/// Sink that records alerts in the log stream (default implementation)
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotificationSink;

#[async_trait::async_trait]
impl NotificationSink for LogNotificationSink {
    async fn notify(&self, title: &str, body: &str) {
        info!(title = %title, body = %body, "User notification");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_sink_does_not_panic() {
        LogNotificationSink.notify("Invitation accepted", "Bob joined T-Alpha").await;
    }
}
