use axum::Router;
use axum::extract::State;
use std::sync::Arc;

pub mod api;
pub mod app_env;
pub mod domain;
pub mod dto;
pub mod external_connections;
pub mod logging;
pub mod persistence;
pub mod routing_utils;
pub mod view;

/// Data shared by every request handler
pub struct SharedData {
    pub ext_cxn: persistence::ExternalConnectivity,
    /// Whether session cookies carry the `Secure` attribute
    pub secure_cookies: bool,
}

/// Extractor for the state handed to every route
pub type AppState = State<Arc<SharedData>>;

/// Assembles every page of the site into a single router with request tracing attached
pub fn build_router(shared_data: SharedData) -> Router {
    let router = Router::new()
        .merge(api::dashboard::dashboard_routes())
        .merge(api::auth::auth_routes())
        .with_state(Arc::new(shared_data));

    logging::attach_tracing_http(router)
}
