use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A server-owned task. The backend assigns `id` and `created_at`; the
/// client never edits a task in place, it reloads the collection after
/// every write.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Body for `POST /tasks`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTask {
    pub title: String,
    pub completed: bool,
}

/// Body for `PUT /tasks/:id`. `None` fields are left out of the JSON so
/// the server only touches what was sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// Transient form state for the create/edit form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub completed: bool,
}

impl TaskDraft {
    /// A draft is submittable once the title is non-blank.
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty()
    }

    pub fn as_new_task(&self) -> NewTask {
        NewTask {
            title: self.title.trim().to_string(),
            completed: self.completed,
        }
    }

    pub fn as_patch(&self) -> TaskPatch {
        TaskPatch {
            title: Some(self.title.trim().to_string()),
            completed: Some(self.completed),
        }
    }
}
