//! User profiles and portal roles
//!
//! Profiles come from the external auth-backed store; the portal trusts it
//! as the source of truth for recipient identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Portal role of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
    Faculty,
    Reviewer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Student => "student",
            Role::Faculty => "faculty",
            Role::Reviewer => "reviewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile document for a portal user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User UUID (primary key)
    pub id: Uuid,

    /// Contact email, used as the invitation recipient address
    pub email: String,

    /// Display name
    pub name: String,

    /// Portal role
    pub role: Role,

    /// Whether the auth provider has verified this account
    pub is_verified: bool,

    /// Faculty specialization, if any
    pub specialization: Option<String>,

    /// Student roll number, if any
    pub roll_no: Option<String>,

    /// Maximum teams a faculty guide may supervise
    pub max_teams: Option<u32>,
}

impl UserProfile {
    /// Minimal profile with the role-independent fields filled in
    pub fn new(email: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            name: name.into(),
            role,
            is_verified: false,
            specialization: None,
            roll_no: None,
            max_teams: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Faculty).unwrap(), "\"faculty\"");
        let role: Role = serde_json::from_str("\"reviewer\"").unwrap();
        assert_eq!(role, Role::Reviewer);
    }

    #[test]
    fn test_new_profile_defaults() {
        let profile = UserProfile::new("bob@x.edu", "Bob", Role::Student);
        assert_eq!(profile.email, "bob@x.edu");
        assert!(!profile.is_verified);
        assert!(profile.roll_no.is_none());
    }
}
