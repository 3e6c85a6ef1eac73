use super::{escape, url_component};
use crate::domain::task_form::{FormMode, SAVING_LABEL, TaskForm};

/// Disables the submit button once the browser sends the form, so a second click can't post
/// it again while the first save is still in flight
const SUBMIT_GUARD: &str = "if(this.dataset.submitting){return false;}\
this.dataset.submitting='1';\
var button=this.querySelector('button[type=submit]');\
button.disabled=true;button.textContent=this.dataset.savingLabel;";

/// Where a form in [mode] submits to
pub fn form_action(mode: &FormMode) -> String {
    match mode {
        FormMode::Create => "/dashboard/tasks".to_owned(),
        FormMode::Edit { task_id } => format!("/dashboard/tasks/{}", url_component(&task_id.0)),
    }
}

/// Renders the create/edit form. [page] is carried along so the dashboard comes back on the
/// same page after submitting.
pub fn render_task_form(form: &TaskForm, page: u32) -> String {
    let error = form
        .error_message()
        .map(|message| format!("<p class=\"error\">{}</p>", escape(message)))
        .unwrap_or_default();
    let checked = if form.is_complete() { " checked" } else { "" };
    let disabled = if form.is_submitting() { " disabled" } else { "" };

    format!(
        "<form method=\"post\" action=\"{action}\" data-saving-label=\"{SAVING_LABEL}\" onsubmit=\"{SUBMIT_GUARD}\">\
<input type=\"hidden\" name=\"page\" value=\"{page}\">\
<div><label for=\"task\">Task</label>\
<input id=\"task\" type=\"text\" name=\"task\" value=\"{task}\" required></div>\
<div><label><input type=\"checkbox\" name=\"is_complete\"{checked}> Completed</label></div>\
{error}\
<button type=\"submit\"{disabled}>{label}</button>\
</form>",
        action = escape(&form_action(form.mode())),
        task = escape(form.task()),
        label = form.submit_label(),
    )
}
