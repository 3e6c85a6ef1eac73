use chrono::{DateTime, Utc};
use derive_more::Display;
use validator::Validate;

/// Opaque identifier the data service assigns to a task when it's inserted
#[derive(Clone, Debug, PartialEq, Eq, Hash, Display)]
pub struct TaskId(pub String);

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        TaskId(value.to_owned())
    }
}

/// A single row of the user's to-do list
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TodoTask {
    pub id: TaskId,
    pub task: String,
    pub is_complete: bool,
    pub created_at: DateTime<Utc>,
    pub user_id: String,
}

/// The user-editable fields of a task as entered into the task form
#[derive(Clone, Debug, PartialEq, Eq, Validate)]
pub struct TaskDraft {
    #[validate(length(min = 1))]
    pub task: String,
    pub is_complete: bool,
}

/// A task ready to be inserted for its owner
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTask {
    pub task: String,
    pub is_complete: bool,
    pub user_id: String,
}

/// Replacement values for the mutable fields of an existing task
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateTask {
    pub task: String,
    pub is_complete: bool,
}

/// Offset-based window into the task list, newest tasks first
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Window for the 1-indexed [page] when pages hold [page_size] tasks. Page numbers below 1
    /// are treated as page 1.
    pub fn for_page(page: u32, page_size: u32) -> Self {
        PageRequest {
            offset: page.max(1).saturating_sub(1).saturating_mul(page_size),
            limit: page_size,
        }
    }
}

pub mod driven_ports {
    use super::*;
    use crate::external_connections::ExternalConnectivity;

    pub trait TaskReader {
        /// Fetches the tasks inside [page], ordered by creation time with the newest first
        async fn task_page(
            &self,
            page: PageRequest,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<Vec<TodoTask>, anyhow::Error>;
    }

    pub trait TaskWriter {
        async fn create_task(
            &self,
            new_task: &NewTask,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<(), anyhow::Error>;

        async fn update_task(
            &self,
            task_id: &TaskId,
            update: &UpdateTask,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<(), anyhow::Error>;

        async fn delete_task(
            &self,
            task_id: &TaskId,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<(), anyhow::Error>;
    }
}


#[cfg(test)]
pub mod test_util {
    use super::*;
    use crate::domain::test_util::Connectivity;
    use crate::external_connections::ExternalConnectivity;
    use chrono::{Duration, TimeZone};
    use std::sync::RwLock;

    /// Stand-in for the remote "todos" table. Every inserted row gets a creation time one minute
    /// after the previous one so ordering by creation time is deterministic.
    pub struct InMemoryTaskPersistence {
        pub tasks: Vec<TodoTask>,
        pub connected: Connectivity,
        /// When set, writes are rejected with this message in the style of the data service
        pub write_rejection: Option<String>,
        highest_task_id: u32,
    }

    pub fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
            .single()
            .expect("base time should be unambiguous")
    }

    impl InMemoryTaskPersistence {
        pub fn new() -> InMemoryTaskPersistence {
            InMemoryTaskPersistence {
                tasks: Vec::new(),
                connected: Connectivity::Connected,
                write_rejection: None,
                highest_task_id: 0,
            }
        }

        /// Creates a table holding tasks with the given descriptions, inserted in order and
        /// all owned by [user_id]
        pub fn new_with_tasks(user_id: &str, descriptions: &[&str]) -> InMemoryTaskPersistence {
            let mut persistence = Self::new();
            for description in descriptions {
                persistence.insert(NewTask {
                    task: description.to_string(),
                    is_complete: false,
                    user_id: user_id.to_owned(),
                });
            }

            persistence
        }

        pub fn new_locked() -> RwLock<InMemoryTaskPersistence> {
            RwLock::new(Self::new())
        }

        fn insert(&mut self, new_task: NewTask) -> TaskId {
            self.highest_task_id += 1;
            let id = TaskId(self.highest_task_id.to_string());
            self.tasks.push(TodoTask {
                id: id.clone(),
                task: new_task.task,
                is_complete: new_task.is_complete,
                created_at: base_time() + Duration::minutes(self.highest_task_id as i64),
                user_id: new_task.user_id,
            });

            id
        }

        pub fn task(&self, task_id: &str) -> Option<&TodoTask> {
            self.tasks.iter().find(|task| task.id.0 == task_id)
        }

        fn reject_writes_if_configured(&self) -> Result<(), anyhow::Error> {
            match self.write_rejection {
                Some(ref message) => Err(anyhow::anyhow!(message.clone())),
                None => Ok(()),
            }
        }
    }

    impl driven_ports::TaskReader for RwLock<InMemoryTaskPersistence> {
        async fn task_page(
            &self,
            page: PageRequest,
            _ext_cxn: &impl ExternalConnectivity,
        ) -> Result<Vec<TodoTask>, anyhow::Error> {
            let persistence = self.read().expect("task persist rw lock poisoned");
            persistence.connected.blow_up_if_disconnected()?;

            let mut newest_first = persistence.tasks.clone();
            newest_first.sort_by(|a, b| b.created_at.cmp(&a.created_at));

            Ok(newest_first
                .into_iter()
                .skip(page.offset as usize)
                .take(page.limit as usize)
                .collect())
        }
    }

    impl driven_ports::TaskWriter for RwLock<InMemoryTaskPersistence> {
        async fn create_task(
            &self,
            new_task: &NewTask,
            _ext_cxn: &impl ExternalConnectivity,
        ) -> Result<(), anyhow::Error> {
            let mut persistence = self.write().expect("task persist rw lock poisoned");
            persistence.connected.blow_up_if_disconnected()?;
            persistence.reject_writes_if_configured()?;

            persistence.insert(new_task.clone());
            Ok(())
        }

        async fn update_task(
            &self,
            task_id: &TaskId,
            update: &UpdateTask,
            _ext_cxn: &impl ExternalConnectivity,
        ) -> Result<(), anyhow::Error> {
            let mut persistence = self.write().expect("task persist rw lock poisoned");
            persistence.connected.blow_up_if_disconnected()?;
            persistence.reject_writes_if_configured()?;

            if let Some(task) = persistence.tasks.iter_mut().find(|task| &task.id == task_id) {
                task.task = update.task.clone();
                task.is_complete = update.is_complete;
            }

            Ok(())
        }

        async fn delete_task(
            &self,
            task_id: &TaskId,
            _ext_cxn: &impl ExternalConnectivity,
        ) -> Result<(), anyhow::Error> {
            let mut persistence = self.write().expect("task persist rw lock poisoned");
            persistence.connected.blow_up_if_disconnected()?;
            persistence.reject_writes_if_configured()?;

            persistence.tasks.retain(|task| &task.id != task_id);
            Ok(())
        }
    }

    /// Counts how many times each port method was hit, wrapping another implementation
    pub struct CountingTaskPorts<'inner> {
        pub inner: &'inner RwLock<InMemoryTaskPersistence>,
        pub calls: std::sync::Mutex<Vec<&'static str>>,
    }

    impl<'inner> CountingTaskPorts<'inner> {
        pub fn wrapping(inner: &'inner RwLock<InMemoryTaskPersistence>) -> Self {
            CountingTaskPorts {
                inner,
                calls: std::sync::Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().expect("call log mutex poisoned").clone()
        }

        fn record(&self, call: &'static str) {
            self.calls.lock().expect("call log mutex poisoned").push(call);
        }
    }

    impl driven_ports::TaskReader for CountingTaskPorts<'_> {
        async fn task_page(
            &self,
            page: PageRequest,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<Vec<TodoTask>, anyhow::Error> {
            self.record("task_page");
            driven_ports::TaskReader::task_page(self.inner, page, ext_cxn).await
        }
    }

    impl driven_ports::TaskWriter for CountingTaskPorts<'_> {
        async fn create_task(
            &self,
            new_task: &NewTask,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<(), anyhow::Error> {
            self.record("create_task");
            driven_ports::TaskWriter::create_task(self.inner, new_task, ext_cxn).await
        }

        async fn update_task(
            &self,
            task_id: &TaskId,
            update: &UpdateTask,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<(), anyhow::Error> {
            self.record("update_task");
            driven_ports::TaskWriter::update_task(self.inner, task_id, update, ext_cxn).await
        }

        async fn delete_task(
            &self,
            task_id: &TaskId,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<(), anyhow::Error> {
            self.record("delete_task");
            driven_ports::TaskWriter::delete_task(self.inner, task_id, ext_cxn).await
        }
    }
}
