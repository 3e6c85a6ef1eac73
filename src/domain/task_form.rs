use crate::domain::session::driven_ports::SessionReader;
use crate::domain::session::{UserResolutionError, resolve_acting_user};
use crate::domain::todo::driven_ports::TaskWriter;
use crate::domain::todo::{NewTask, TaskDraft, TaskId, TodoTask, UpdateTask};
use crate::external_connections::ExternalConnectivity;
use thiserror::Error;
use tracing::{error, info};
use validator::Validate;

/// Shown when a failure doesn't come with a message of its own
pub const FALLBACK_ERROR_MESSAGE: &str = "Something went wrong";

/// Submit button label while a save is in flight
pub const SAVING_LABEL: &str = "Saving...";

#[derive(Debug, Error)]
pub enum TaskFormError {
    #[error("Please enter a task.")]
    TaskRequired,
    #[error(transparent)]
    NoActingUser(#[from] UserResolutionError),
    /// The data service refused the write. Displays exactly what the service said.
    #[error(transparent)]
    WriteFailed(anyhow::Error),
}

impl TaskFormError {
    /// Text to show the user inline in the form
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            FALLBACK_ERROR_MESSAGE.to_owned()
        } else {
            message
        }
    }
}

/// Whether the form creates a new task or edits an existing one
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { task_id: TaskId },
}

/// State of the create/edit form for a single task
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskForm {
    mode: FormMode,
    task: String,
    is_complete: bool,
    submitting: bool,
    error_message: Option<String>,
}

impl TaskForm {
    /// An empty form for creating a task
    pub fn for_new_task() -> Self {
        TaskForm {
            mode: FormMode::Create,
            task: String::new(),
            is_complete: false,
            submitting: false,
            error_message: None,
        }
    }

    /// A form prefilled with an existing task's values
    pub fn for_existing(existing: &TodoTask) -> Self {
        TaskForm {
            mode: FormMode::Edit {
                task_id: existing.id.clone(),
            },
            task: existing.task.clone(),
            is_complete: existing.is_complete,
            submitting: false,
            error_message: None,
        }
    }

    /// A form in [mode] holding values the user already entered
    pub fn with_draft(mode: FormMode, draft: TaskDraft) -> Self {
        TaskForm {
            mode,
            task: draft.task,
            is_complete: draft.is_complete,
            submitting: false,
            error_message: None,
        }
    }

    pub fn set_task(&mut self, task: impl Into<String>) {
        self.task = task.into();
    }

    pub fn set_complete(&mut self, is_complete: bool) {
        self.is_complete = is_complete;
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn submit_label(&self) -> &'static str {
        match (self.submitting, &self.mode) {
            (true, _) => SAVING_LABEL,
            (false, FormMode::Edit { .. }) => "Update Task",
            (false, FormMode::Create) => "Create Task",
        }
    }

    /// Writes the form's values to the data service. A new task is attributed to whoever is
    /// currently signed in. On failure the error is also kept on the form for display, and
    /// the form can be submitted again.
    pub async fn submit(
        &mut self,
        ext_cxn: &impl ExternalConnectivity,
        session_read: &impl SessionReader,
        task_write: &impl TaskWriter,
    ) -> Result<(), TaskFormError> {
        self.error_message = None;
        self.submitting = true;
        let outcome = self.write(ext_cxn, session_read, task_write).await;
        self.submitting = false;

        if let Err(ref err) = outcome {
            error!("Task form submission failed: {err:#}");
            self.error_message = Some(err.user_message());
        }

        outcome
    }

    async fn write(
        &self,
        ext_cxn: &impl ExternalConnectivity,
        session_read: &impl SessionReader,
        task_write: &impl TaskWriter,
    ) -> Result<(), TaskFormError> {
        let draft = TaskDraft {
            task: self.task.clone(),
            is_complete: self.is_complete,
        };
        draft.validate().map_err(|_| TaskFormError::TaskRequired)?;

        match self.mode {
            FormMode::Edit { ref task_id } => {
                let update = UpdateTask {
                    task: draft.task,
                    is_complete: draft.is_complete,
                };
                task_write
                    .update_task(task_id, &update, ext_cxn)
                    .await
                    .map_err(TaskFormError::WriteFailed)?;
                info!("Updated task {task_id}");
            }
            FormMode::Create => {
                let user_id = resolve_acting_user(ext_cxn, session_read).await?;
                let new_task = NewTask {
                    task: draft.task,
                    is_complete: draft.is_complete,
                    user_id,
                };
                task_write
                    .create_task(&new_task, ext_cxn)
                    .await
                    .map_err(TaskFormError::WriteFailed)?;
                info!("Created a task for user {}", new_task.user_id);
            }
        }

        Ok(())
    }
}
