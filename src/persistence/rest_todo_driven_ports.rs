use crate::domain;
use crate::domain::todo::{NewTask, PageRequest, TaskId, TodoTask, UpdateTask};
use crate::external_connections::ExternalConnectivity;
use anyhow::{Context, Error};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of the table holding every user's tasks
const TODO_TABLE: &str = "todos";

/// Reads and writes tasks through the data service's table API
pub struct RestTaskStore;

/// The data service hands out IDs as numbers or strings depending on the column type
#[derive(Deserialize)]
#[serde(untagged)]
enum RowId {
    Number(i64),
    Text(String),
}

impl From<RowId> for TaskId {
    fn from(value: RowId) -> Self {
        match value {
            RowId::Number(id) => TaskId(id.to_string()),
            RowId::Text(id) => TaskId(id),
        }
    }
}

#[derive(Deserialize)]
struct TodoRow {
    id: RowId,
    task: String,
    #[serde(default)]
    is_complete: bool,
    created_at: DateTime<Utc>,
    user_id: String,
}

impl From<TodoRow> for domain::todo::TodoTask {
    fn from(value: TodoRow) -> Self {
        TodoTask {
            id: value.id.into(),
            task: value.task,
            is_complete: value.is_complete,
            created_at: value.created_at,
            user_id: value.user_id,
        }
    }
}

#[derive(Serialize)]
struct InsertRow<'task> {
    task: &'task str,
    is_complete: bool,
    user_id: &'task str,
}

#[derive(Serialize)]
struct UpdateRow<'task> {
    task: &'task str,
    is_complete: bool,
}

fn table_url(ext_cxn: &impl ExternalConnectivity) -> String {
    format!("{}/rest/v1/{TODO_TABLE}", ext_cxn.data_service().base_url)
}

/// Query parameters selecting one page of tasks, newest first
fn page_query(page: PageRequest) -> [(&'static str, String); 4] {
    [
        ("select", "*".to_owned()),
        ("order", "created_at.desc".to_owned()),
        ("offset", page.offset.to_string()),
        ("limit", page.limit.to_string()),
    ]
}

/// Query parameter filtering to a single task
fn id_filter(task_id: &TaskId) -> [(&'static str, String); 1] {
    [("id", format!("eq.{task_id}"))]
}

impl domain::todo::driven_ports::TaskReader for RestTaskStore {
    async fn task_page(
        &self,
        page: PageRequest,
        ext_cxn: &impl ExternalConnectivity,
    ) -> Result<Vec<TodoTask>, Error> {
        let request = ext_cxn
            .http_client()
            .get(table_url(ext_cxn))
            .query(&page_query(page));
        let response = super::authorize(request, ext_cxn)
            .send()
            .await
            .context("trying to fetch a page of tasks")?;

        let rows: Vec<TodoRow> = super::reject_unless_success(response)
            .await?
            .json()
            .await
            .context("trying to read a page of tasks")?;

        Ok(rows.into_iter().map(TodoTask::from).collect())
    }
}

impl domain::todo::driven_ports::TaskWriter for RestTaskStore {
    async fn create_task(
        &self,
        new_task: &NewTask,
        ext_cxn: &impl ExternalConnectivity,
    ) -> Result<(), Error> {
        let rows = [InsertRow {
            task: &new_task.task,
            is_complete: new_task.is_complete,
            user_id: &new_task.user_id,
        }];
        let request = ext_cxn
            .http_client()
            .post(table_url(ext_cxn))
            .header("Prefer", "return=minimal")
            .json(&rows);
        let response = super::authorize(request, ext_cxn)
            .send()
            .await
            .context("trying to insert a new task")?;

        super::reject_unless_success(response).await?;
        Ok(())
    }

    async fn update_task(
        &self,
        task_id: &TaskId,
        update: &UpdateTask,
        ext_cxn: &impl ExternalConnectivity,
    ) -> Result<(), Error> {
        let request = ext_cxn
            .http_client()
            .patch(table_url(ext_cxn))
            .query(&id_filter(task_id))
            .header("Prefer", "return=minimal")
            .json(&UpdateRow {
                task: &update.task,
                is_complete: update.is_complete,
            });
        let response = super::authorize(request, ext_cxn)
            .send()
            .await
            .context("trying to update a task")?;

        super::reject_unless_success(response).await?;
        Ok(())
    }

    async fn delete_task(
        &self,
        task_id: &TaskId,
        ext_cxn: &impl ExternalConnectivity,
    ) -> Result<(), Error> {
        let request = ext_cxn
            .http_client()
            .delete(table_url(ext_cxn))
            .query(&id_filter(task_id));
        let response = super::authorize(request, ext_cxn)
            .send()
            .await
            .context("trying to remove a task")?;

        super::reject_unless_success(response).await?;
        Ok(())
    }
}
