use crate::api::dashboard::DASHBOARD_PATH;
use crate::domain;
use crate::domain::session::SignInError;
use crate::domain::session::driven_ports::Authenticator;
use crate::domain::task_form::FALLBACK_ERROR_MESSAGE;
use crate::dto::auth::LoginSubmission;
use crate::external_connections::ExternalConnectivity;
use crate::persistence::rest_auth_driven_ports::RestAuth;
use crate::routing_utils::{self, Form, LOGIN_PATH};
use crate::{AppState, SharedData, view};
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use std::sync::Arc;
use tracing::{debug, error, warn};
use validator::Validate;

/// Shown when the sign-in form fails its own checks before reaching the auth service
const INVALID_LOGIN_MESSAGE: &str = "Please enter a valid email address and password.";

/// Builds a router for signing in and out
pub fn auth_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            LOGIN_PATH,
            get(|headers: HeaderMap| async move { show_login(&headers) }).post(
                |State(app_state): AppState, Form(submission): Form<LoginSubmission>| async move {
                    let ext_cxn = app_state.ext_cxn.for_session(None);

                    log_in(submission, &ext_cxn, &RestAuth, app_state.secure_cookies).await
                },
            ),
        )
        .route(
            "/logout",
            post(|State(app_state): AppState, headers: HeaderMap| async move {
                let ext_cxn = app_state
                    .ext_cxn
                    .for_session(routing_utils::session_from_headers(&headers));

                log_out(&ext_cxn, &RestAuth, app_state.secure_cookies).await
            }),
        )
}

/// Shows the sign-in form, or skips straight to the dashboard for someone already signed in
fn show_login(headers: &HeaderMap) -> Response {
    if routing_utils::session_from_headers(headers).is_some() {
        return Redirect::to(DASHBOARD_PATH).into_response();
    }

    Html(view::auth::render_login("", None)).into_response()
}

/// Signs in with the submitted credentials and stores the new session in cookies.
/// [secure_cookies] restricts those cookies to HTTPS.
async fn log_in(
    submission: LoginSubmission,
    ext_cxn: &impl ExternalConnectivity,
    authenticator: &impl Authenticator,
    secure_cookies: bool,
) -> Response {
    debug!("Sign-in form submitted");
    if let Err(validation_errors) = submission.validate() {
        warn!("Sign-in form failed validation: {validation_errors}");
        return (
            StatusCode::BAD_REQUEST,
            Html(view::auth::render_login(
                &submission.email,
                Some(INVALID_LOGIN_MESSAGE),
            )),
        )
            .into_response();
    }

    let email = submission.email.clone();
    let sign_in_result = domain::session::sign_in(&submission.into(), ext_cxn, authenticator).await;
    match sign_in_result {
        Ok(session) => match routing_utils::session_cookies(&session, secure_cookies) {
            Ok(cookies) => (cookies, Redirect::to(DASHBOARD_PATH)).into_response(),
            Err(err) => {
                error!("Signed in but could not store the session: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(view::auth::render_login(&email, Some(FALLBACK_ERROR_MESSAGE))),
                )
                    .into_response()
            }
        },
        Err(SignInError::Rejected(message)) => {
            warn!("Auth service rejected sign-in: {message}");
            let message = if message.trim().is_empty() {
                FALLBACK_ERROR_MESSAGE
            } else {
                message.as_str()
            };
            (
                StatusCode::UNAUTHORIZED,
                Html(view::auth::render_login(&email, Some(message))),
            )
                .into_response()
        }
        Err(SignInError::PortError(err)) => {
            error!("Sign-in failed: {err:#}");
            (
                StatusCode::BAD_GATEWAY,
                Html(view::auth::render_login(&email, Some(FALLBACK_ERROR_MESSAGE))),
            )
                .into_response()
        }
    }
}

/// Ends the session with the auth service if possible, then forgets it locally regardless
async fn log_out(
    ext_cxn: &impl ExternalConnectivity,
    authenticator: &impl Authenticator,
    secure_cookies: bool,
) -> Response {
    domain::session::sign_out(ext_cxn, authenticator).await;

    (
        routing_utils::clear_session_cookies(secure_cookies),
        Redirect::to(LOGIN_PATH),
    )
        .into_response()
}
