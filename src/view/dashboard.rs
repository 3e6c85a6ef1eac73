use super::modal::render_modal;
use super::task_form::render_task_form;
use super::{escape, layout, url_component};
use crate::domain::dashboard::DashboardPage;
use crate::domain::task_form::TaskForm;
use crate::domain::todo::TodoTask;
use chrono::Local;

/// Link to [page] of the dashboard with no modal open
pub fn page_href(page: u32) -> String {
    format!("/dashboard?page={page}")
}

fn render_row(task: &TodoTask, page: u32) -> String {
    let id = url_component(&task.id.0);
    let created = task
        .created_at
        .with_timezone(&Local)
        .format("%-m/%-d/%Y, %-I:%M:%S %p");
    let status = if task.is_complete { "✅" } else { "❌" };

    format!(
        "<tr><td>{created}</td><td>{description}</td><td>{status}</td>\
<td><a href=\"/dashboard?page={page}&amp;modal=edit&amp;task_id={id}\">Edit</a>\
<form method=\"post\" action=\"/dashboard/tasks/{id}/delete\" style=\"display:inline\">\
<input type=\"hidden\" name=\"page\" value=\"{page}\">\
<button type=\"submit\">Delete</button></form></td></tr>",
        description = escape(&task.task),
    )
}

fn render_rows(dashboard: &DashboardPage) -> String {
    if dashboard.tasks().is_empty() {
        return "<tr><td colspan=\"4\">No tasks found.</td></tr>".to_owned();
    }

    dashboard
        .tasks()
        .iter()
        .map(|task| render_row(task, dashboard.page()))
        .collect()
}

fn render_pagination(dashboard: &DashboardPage) -> String {
    let nav_button = |nav: &str, label: &str, enabled: bool| {
        let disabled = if enabled { "" } else { " disabled" };
        format!(
            "<form method=\"get\" action=\"/dashboard\" style=\"display:inline\">\
<input type=\"hidden\" name=\"page\" value=\"{page}\">\
<button type=\"submit\" name=\"nav\" value=\"{nav}\"{disabled}>{label}</button></form>",
            page = dashboard.page(),
        )
    };

    format!(
        "<nav class=\"pagination\">{}{}</nav>",
        nav_button("previous", "Previous", dashboard.can_go_previous()),
        nav_button("next", "Next", dashboard.can_go_next()),
    )
}

/// Renders the whole dashboard. When [open_form] is given it's shown in a modal over the
/// task list.
pub fn render_dashboard(dashboard: &DashboardPage, open_form: Option<&TaskForm>) -> String {
    let page = dashboard.page();
    let modal = open_form
        .map(|form| render_modal(&render_task_form(form, page), &page_href(page)))
        .unwrap_or_default();

    layout(
        "My To-Do List",
        &format!(
            "<header><h1>My To-Do List</h1>\
<a href=\"/dashboard?page={page}&amp;modal=create\">Create Task</a>\
<form method=\"post\" action=\"/logout\" style=\"display:inline\"><button type=\"submit\">Sign out</button></form>\
</header>\
<table><thead><tr><th>Date</th><th>Task</th><th>Status</th><th>Actions</th></tr></thead>\
<tbody>{rows}</tbody></table>\
{pagination}{modal}",
            rows = render_rows(dashboard),
            pagination = render_pagination(dashboard),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::todo::TaskId;
    use crate::domain::todo::test_util::{InMemoryTaskPersistence, base_time};
    use crate::external_connections::test_util::FakeExternalConnectivity;
    use std::sync::RwLock;

    async fn dashboard_with(descriptions: &[&str], page: u32) -> DashboardPage {
        let table = RwLock::new(InMemoryTaskPersistence::new_with_tasks(
            "user-1",
            descriptions,
        ));
        DashboardPage::load(page, &FakeExternalConnectivity::new(), &table).await
    }

    #[tokio::test]
    async fn empty_list_says_so() {
        let html = render_dashboard(&dashboard_with(&[], 1).await, None);
        assert!(html.contains("No tasks found."));
        assert!(!html.contains("modal-backdrop"));
    }

    #[tokio::test]
    async fn rows_are_escaped_and_carry_actions() {
        let html = render_dashboard(&dashboard_with(&["<i>done</i>"], 1).await, None);
        assert!(html.contains("&lt;i&gt;done&lt;/i&gt;"));
        assert!(!html.contains("<i>done</i>"));
        assert!(html.contains("href=\"/dashboard?page=1&amp;modal=edit&amp;task_id=1\""));
        assert!(html.contains("action=\"/dashboard/tasks/1/delete\""));
        assert!(html.contains("❌"));
    }

    #[test]
    fn opaque_ids_are_percent_encoded_in_links() {
        let task = TodoTask {
            id: TaskId::from("a&b/c#1"),
            task: "odd id".to_owned(),
            is_complete: true,
            created_at: base_time(),
            user_id: "user-1".to_owned(),
        };

        let html = render_row(&task, 2);
        assert!(html.contains("href=\"/dashboard?page=2&amp;modal=edit&amp;task_id=a%26b%2Fc%231\""));
        assert!(html.contains("action=\"/dashboard/tasks/a%26b%2Fc%231/delete\""));
        assert!(html.contains("✅"));
    }

    #[tokio::test]
    async fn first_page_disables_previous() {
        let html = render_dashboard(
            &dashboard_with(&["1", "2", "3", "4", "5", "6", "7"], 1).await,
            None,
        );
        assert!(html.contains("value=\"previous\" disabled>Previous"));
        assert!(html.contains("value=\"next\">Next"));
    }

    #[tokio::test]
    async fn short_page_disables_next() {
        let html = render_dashboard(
            &dashboard_with(&["1", "2", "3", "4", "5", "6", "7"], 2).await,
            None,
        );
        assert!(html.contains("value=\"previous\">Previous"));
        assert!(html.contains("value=\"next\" disabled>Next"));
    }

    #[tokio::test]
    async fn open_form_is_rendered_in_modal() {
        let dashboard = dashboard_with(&["1"], 1).await;
        let html = render_dashboard(&dashboard, Some(&TaskForm::for_new_task()));
        assert!(html.contains("modal-backdrop"));
        assert!(html.contains("action=\"/dashboard/tasks\""));
        assert!(html.contains("class=\"modal-close\" href=\"/dashboard?page=1\""));
    }
}
