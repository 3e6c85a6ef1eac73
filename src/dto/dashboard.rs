use serde::Deserialize;

/// Which modal the dashboard should open with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalRequest {
    Create,
    Edit,
}

/// Pagination button that was pressed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageNav {
    Previous,
    Next,
}

/// Query string of the dashboard page
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub page: Option<u32>,
    pub modal: Option<ModalRequest>,
    pub task_id: Option<String>,
    pub nav: Option<PageNav>,
}

impl DashboardQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }
}
