use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::DocumentType;

/// Pending-flow state for one chat session. At most one record exists per
/// session; its variant alone decides how the next raw input is interpreted.
/// Absence of a record means no flow is pending.
///
/// Serializes as `{"current_action": "...", "context_data": {...}}`, which is
/// also the persisted row shape (tag column + jsonb payload).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "current_action", content = "context_data", rename_all = "snake_case")]
pub enum PendingAction {
    AwaitingConfirmation {
        #[serde(default)]
        command: Option<String>,
    },
    AwaitingAssignment {
        title: String,
        task_id: Uuid,
    },
    AwaitingProject {
        title: String,
        last_options: Vec<String>,
    },
    AwaitingProjectDoc {
        title: String,
        doc_type: DocumentType,
        last_options: Vec<String>,
    },
}

impl PendingAction {
    pub fn action_tag(&self) -> &'static str {
        match self {
            Self::AwaitingConfirmation { .. } => "awaiting_confirmation",
            Self::AwaitingAssignment { .. } => "awaiting_assignment",
            Self::AwaitingProject { .. } => "awaiting_project",
            Self::AwaitingProjectDoc { .. } => "awaiting_project_doc",
        }
    }
}
