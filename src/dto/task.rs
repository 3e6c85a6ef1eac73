use crate::domain;
use serde::Deserialize;

/// Body of the create/edit task form
#[derive(Debug, Deserialize)]
#[cfg_attr(test, derive(serde::Serialize))]
pub struct TaskSubmission {
    #[serde(default)]
    pub task: String,
    /// HTML checkboxes are only submitted when ticked
    #[serde(default)]
    pub is_complete: Option<String>,
    /// Dashboard page the form was opened from
    #[serde(default)]
    pub page: Option<u32>,
}

impl TaskSubmission {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }
}

impl From<TaskSubmission> for domain::todo::TaskDraft {
    fn from(value: TaskSubmission) -> Self {
        domain::todo::TaskDraft {
            task: value.task,
            is_complete: value.is_complete.is_some(),
        }
    }
}

/// Body of the delete button's form
#[derive(Debug, Deserialize)]
#[cfg_attr(test, derive(serde::Serialize))]
pub struct DeleteSubmission {
    #[serde(default)]
    pub page: Option<u32>,
}

impl DeleteSubmission {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }
}
