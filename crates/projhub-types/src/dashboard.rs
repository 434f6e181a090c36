//! Role-to-dashboard dispatch
//!
//! The UI renders one dashboard variant per role. Dispatch happens in a
//! single explicit mapping function rather than scattered role conditionals.

use crate::Role;
use serde::{Deserialize, Serialize};

/// The dashboard surface a signed-in user lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardView {
    /// User management, team oversight, evaluation scheduling
    AdminOverview,
    /// Team formation, invitations, project status
    StudentWorkspace,
    /// Guided teams, feedback forms
    FacultyGuidePanel,
    /// Assigned evaluations and review queue
    ReviewerQueue,
}

/// Map a role to its dashboard variant
pub fn dashboard_for(role: Role) -> DashboardView {
    match role {
        Role::Admin => DashboardView::AdminOverview,
        Role::Student => DashboardView::StudentWorkspace,
        Role::Faculty => DashboardView::FacultyGuidePanel,
        Role::Reviewer => DashboardView::ReviewerQueue,
    }
}
