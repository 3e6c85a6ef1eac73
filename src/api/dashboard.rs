use crate::domain::dashboard::DashboardPage;
use crate::domain::session::driven_ports::SessionReader;
use crate::domain::task_form::{FormMode, TaskForm};
use crate::domain::todo::TaskId;
use crate::domain::todo::driven_ports::{TaskReader, TaskWriter};
use crate::dto::dashboard::{DashboardQuery, ModalRequest, PageNav};
use crate::dto::task::{DeleteSubmission, TaskSubmission};
use crate::external_connections::ExternalConnectivity;
use crate::persistence::rest_auth_driven_ports::RestAuth;
use crate::persistence::rest_todo_driven_ports::RestTaskStore;
use crate::routing_utils::{self, Form, Query};
use crate::{AppState, SharedData, view};
use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use std::sync::Arc;
use tracing::{info, warn};

/// Path of the task list page
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Builds a router for the task list and the forms posted from it. Every route needs a stored
/// session; requests without one are sent to the sign-in page.
pub fn dashboard_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route("/", get(|| async { Redirect::to(DASHBOARD_PATH) }))
        .route(
            DASHBOARD_PATH,
            get(
                |State(app_state): AppState,
                 headers: HeaderMap,
                 Query(query): Query<DashboardQuery>| async move {
                    let Some(session) = routing_utils::session_from_headers(&headers) else {
                        return routing_utils::redirect_to_login();
                    };
                    let ext_cxn = app_state.ext_cxn.for_session(Some(session));

                    show_dashboard(query, &ext_cxn, &RestTaskStore).await
                },
            ),
        )
        .route(
            "/dashboard/tasks",
            post(
                |State(app_state): AppState,
                 headers: HeaderMap,
                 Form(submission): Form<TaskSubmission>| async move {
                    let Some(session) = routing_utils::session_from_headers(&headers) else {
                        return routing_utils::redirect_to_login();
                    };
                    let ext_cxn = app_state.ext_cxn.for_session(Some(session));

                    create_task(submission, &ext_cxn, &RestAuth, &RestTaskStore, &RestTaskStore)
                        .await
                },
            ),
        )
        .route(
            "/dashboard/tasks/:task_id",
            post(
                |State(app_state): AppState,
                 Path(task_id): Path<String>,
                 headers: HeaderMap,
                 Form(submission): Form<TaskSubmission>| async move {
                    let Some(session) = routing_utils::session_from_headers(&headers) else {
                        return routing_utils::redirect_to_login();
                    };
                    let ext_cxn = app_state.ext_cxn.for_session(Some(session));

                    update_task(
                        TaskId(task_id),
                        submission,
                        &ext_cxn,
                        &RestAuth,
                        &RestTaskStore,
                        &RestTaskStore,
                    )
                    .await
                },
            ),
        )
        .route(
            "/dashboard/tasks/:task_id/delete",
            post(
                |State(app_state): AppState,
                 Path(task_id): Path<String>,
                 headers: HeaderMap,
                 Form(submission): Form<DeleteSubmission>| async move {
                    let Some(session) = routing_utils::session_from_headers(&headers) else {
                        return routing_utils::redirect_to_login();
                    };
                    let ext_cxn = app_state.ext_cxn.for_session(Some(session));

                    delete_task(
                        TaskId(task_id),
                        submission,
                        &ext_cxn,
                        &RestTaskStore,
                        &RestTaskStore,
                    )
                    .await
                },
            ),
        )
}

/// Renders a page of tasks. The query can also press a pagination button relative to the
/// requested page and open the create or edit modal.
async fn show_dashboard(
    query: DashboardQuery,
    ext_cxn: &impl ExternalConnectivity,
    task_read: &impl TaskReader,
) -> Response {
    info!("Showing dashboard page {}", query.page());
    let mut dashboard = DashboardPage::load(query.page(), ext_cxn, task_read).await;

    match query.nav {
        Some(PageNav::Previous) => dashboard.previous_page(ext_cxn, task_read).await,
        Some(PageNav::Next) => dashboard.next_page(ext_cxn, task_read).await,
        None => {}
    }

    match (query.modal, query.task_id) {
        (Some(ModalRequest::Create), _) => dashboard.open_create(),
        (Some(ModalRequest::Edit), Some(task_id)) => {
            let task_id = TaskId(task_id);
            match dashboard.task_on_page(&task_id).cloned() {
                Some(task) => dashboard.open_edit(task),
                None => warn!("Task {task_id} isn't on page {}, not opening the editor", dashboard.page()),
            }
        }
        (Some(ModalRequest::Edit), None) => warn!("Edit requested without a task ID"),
        (None, _) => {}
    }

    let form = dashboard.modal().form();
    Html(view::dashboard::render_dashboard(&dashboard, form.as_ref())).into_response()
}

/// Creates a task for the signed-in user from the modal's form
async fn create_task(
    submission: TaskSubmission,
    ext_cxn: &impl ExternalConnectivity,
    session_read: &impl SessionReader,
    task_read: &impl TaskReader,
    task_write: &impl TaskWriter,
) -> Response {
    info!("Creating a task");
    let page = submission.page();
    let form = TaskForm::with_draft(FormMode::Create, submission.into());

    submit_form(form, page, ext_cxn, session_read, task_read, task_write).await
}

/// Saves edits to an existing task from the modal's form
async fn update_task(
    task_id: TaskId,
    submission: TaskSubmission,
    ext_cxn: &impl ExternalConnectivity,
    session_read: &impl SessionReader,
    task_read: &impl TaskReader,
    task_write: &impl TaskWriter,
) -> Response {
    info!("Updating task {task_id}");
    let page = submission.page();
    let form = TaskForm::with_draft(FormMode::Edit { task_id }, submission.into());

    submit_form(form, page, ext_cxn, session_read, task_read, task_write).await
}

/// Submits [form] and renders the dashboard page it was opened from. A successful save shows
/// the refreshed list; a failed one keeps the modal open with the error inside it.
async fn submit_form(
    mut form: TaskForm,
    page: u32,
    ext_cxn: &impl ExternalConnectivity,
    session_read: &impl SessionReader,
    task_read: &impl TaskReader,
    task_write: &impl TaskWriter,
) -> Response {
    let submit_result = form.submit(ext_cxn, session_read, task_write).await;
    let mut dashboard = DashboardPage::at_page(page);

    match submit_result {
        Ok(()) => {
            dashboard.task_saved(ext_cxn, task_read).await;
            Html(view::dashboard::render_dashboard(&dashboard, None)).into_response()
        }
        Err(_) => {
            dashboard.fetch_page(ext_cxn, task_read).await;
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(view::dashboard::render_dashboard(&dashboard, Some(&form))),
            )
                .into_response()
        }
    }
}

/// Deletes a task, then renders the page the delete button was on
async fn delete_task(
    task_id: TaskId,
    submission: DeleteSubmission,
    ext_cxn: &impl ExternalConnectivity,
    task_read: &impl TaskReader,
    task_write: &impl TaskWriter,
) -> Response {
    info!("Deleting task {task_id}");
    let mut dashboard = DashboardPage::at_page(submission.page());
    dashboard
        .delete_task(&task_id, ext_cxn, task_write, task_read)
        .await;

    Html(view::dashboard::render_dashboard(&dashboard, None)).into_response()
}
