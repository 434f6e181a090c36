//! Project read model
//!
//! The portal only reads project titles when composing notifications; the
//! full project document lives in the external project store.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimal view of an academic project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Project UUID (primary key)
    pub id: Uuid,

    /// Team the project is assigned to, once assigned
    pub team_id: Option<Uuid>,

    /// Project title
    pub title: String,

    /// Faculty guide supervising the project, once assigned
    pub guide_id: Option<Uuid>,
}

impl Project {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_id: None,
            title: title.into(),
            guide_id: None,
        }
    }
}
