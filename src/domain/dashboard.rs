use crate::domain::task_form::TaskForm;
use crate::domain::todo::driven_ports::{TaskReader, TaskWriter};
use crate::domain::todo::{PageRequest, TaskId, TodoTask};
use crate::external_connections::ExternalConnectivity;
use tracing::{debug, error, warn};

/// Number of tasks shown on each page of the dashboard
pub const PAGE_SIZE: u32 = 5;

/// What the modal on top of the task list is showing
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskModal {
    Hidden,
    Create,
    Edit(TodoTask),
}

impl TaskModal {
    /// The form the modal should contain, if it's open
    pub fn form(&self) -> Option<TaskForm> {
        match self {
            Self::Hidden => None,
            Self::Create => Some(TaskForm::for_new_task()),
            Self::Edit(task) => Some(TaskForm::for_existing(task)),
        }
    }
}

/// View-model for the paginated task list: which page is showing, the tasks on it, and
/// whether the create/edit modal is open.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardPage {
    page: u32,
    tasks: Vec<TodoTask>,
    loading: bool,
    has_more: bool,
    modal: TaskModal,
}

impl Default for DashboardPage {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardPage {
    /// A dashboard on the first page which hasn't fetched anything yet
    pub fn new() -> Self {
        DashboardPage {
            page: 1,
            tasks: Vec::new(),
            loading: false,
            has_more: true,
            modal: TaskModal::Hidden,
        }
    }

    /// A dashboard positioned on [page] (never lower than 1) which hasn't fetched it yet
    pub fn at_page(page: u32) -> Self {
        DashboardPage {
            page: page.max(1),
            ..Self::new()
        }
    }

    /// Creates a dashboard showing [page] (never lower than 1) and fetches its tasks
    pub async fn load(
        page: u32,
        ext_cxn: &impl ExternalConnectivity,
        task_read: &impl TaskReader,
    ) -> Self {
        let mut dashboard = Self::at_page(page);
        dashboard.fetch_page(ext_cxn, task_read).await;

        dashboard
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn tasks(&self) -> &[TodoTask] {
        &self.tasks
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the last fetch filled the page. A full final page can't be told apart from
    /// one with more tasks after it.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn modal(&self) -> &TaskModal {
        &self.modal
    }

    pub fn can_go_previous(&self) -> bool {
        self.page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.has_more
    }

    /// Looks up a task on the current page by its ID
    pub fn task_on_page(&self, task_id: &TaskId) -> Option<&TodoTask> {
        self.tasks.iter().find(|task| &task.id == task_id)
    }

    /// Replaces the shown tasks with the current page's contents. A failed fetch is logged
    /// and leaves the previously shown tasks in place.
    pub async fn fetch_page(
        &mut self,
        ext_cxn: &impl ExternalConnectivity,
        task_read: &impl TaskReader,
    ) {
        self.loading = true;
        let request = PageRequest::for_page(self.page, PAGE_SIZE);
        debug!(
            "Fetching page {} (offset {}, limit {})",
            self.page, request.offset, request.limit
        );

        match task_read.task_page(request, ext_cxn).await {
            Ok(tasks) => {
                self.has_more = tasks.len() == PAGE_SIZE as usize;
                self.tasks = tasks;
            }
            Err(err) => error!("Error fetching todos: {err:#}"),
        }

        self.loading = false;
    }

    /// Moves to [page] (never lower than 1), fetching it if it differs from the current one
    pub async fn go_to_page(
        &mut self,
        page: u32,
        ext_cxn: &impl ExternalConnectivity,
        task_read: &impl TaskReader,
    ) {
        let target = page.max(1);
        if target == self.page {
            return;
        }

        self.page = target;
        self.fetch_page(ext_cxn, task_read).await;
    }

    /// Steps back one page. Does nothing on the first page.
    pub async fn previous_page(
        &mut self,
        ext_cxn: &impl ExternalConnectivity,
        task_read: &impl TaskReader,
    ) {
        if !self.can_go_previous() {
            return;
        }

        self.go_to_page(self.page - 1, ext_cxn, task_read).await;
    }

    /// Steps forward one page. Does nothing when the current page wasn't full.
    pub async fn next_page(
        &mut self,
        ext_cxn: &impl ExternalConnectivity,
        task_read: &impl TaskReader,
    ) {
        if !self.can_go_next() {
            return;
        }

        self.go_to_page(self.page.saturating_add(1), ext_cxn, task_read).await;
    }

    /// Opens the modal with an empty form
    pub fn open_create(&mut self) {
        self.modal = TaskModal::Create;
    }

    /// Opens the modal with a form for editing [task]
    pub fn open_edit(&mut self, task: TodoTask) {
        self.modal = TaskModal::Edit(task);
    }

    pub fn close_modal(&mut self) {
        self.modal = TaskModal::Hidden;
    }

    /// Deletes a task, then refreshes the current page. The outcome of the delete itself is
    /// only logged: the refreshed page shows whatever the data service now holds.
    pub async fn delete_task(
        &mut self,
        task_id: &TaskId,
        ext_cxn: &impl ExternalConnectivity,
        task_write: &impl TaskWriter,
        task_read: &impl TaskReader,
    ) {
        if let Err(err) = task_write.delete_task(task_id, ext_cxn).await {
            warn!("Ignoring failed delete of task {task_id}: {err:#}");
        }

        self.fetch_page(ext_cxn, task_read).await;
    }

    /// Called once the task form saved successfully: closes the modal and refreshes the page
    pub async fn task_saved(
        &mut self,
        ext_cxn: &impl ExternalConnectivity,
        task_read: &impl TaskReader,
    ) {
        self.close_modal();
        self.fetch_page(ext_cxn, task_read).await;
    }
}
