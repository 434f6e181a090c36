//! Invitation workflow configuration

use std::time::Duration;

/// Tunables for the invitation workflow
///
/// Defaults match interactive use; tests shrink the delays to milliseconds.
#[derive(Debug, Clone)]
pub struct InviteConfig {
    /// Delay between simulated delivery stages
    pub step_delay: Duration,

    /// How long a pending invitation waits for a response before expiring
    pub expiry_window: Duration,

    /// Base URL for invitation response links; the invitation id is appended
    pub link_base: String,
}

impl Default for InviteConfig {
    fn default() -> Self {
        Self {
            step_delay: Duration::from_secs(2),
            expiry_window: Duration::from_secs(72 * 3600),
            link_base: "https://projhub.dev/invitations".to_string(),
        }
    }
}

impl InviteConfig {
    /// Response link for one invitation
    pub fn invitation_link(&self, invitation_id: uuid::Uuid) -> String {
        format!("{}/{}", self.link_base.trim_end_matches('/'), invitation_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_invitation_link_handles_trailing_slash() {
        let id = Uuid::new_v4();
        let mut config = InviteConfig::default();
        config.link_base = "https://x/y/".to_string();
        assert_eq!(config.invitation_link(id), format!("https://x/y/{}", id));
    }
}
