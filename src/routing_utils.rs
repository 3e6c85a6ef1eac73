use crate::domain::session::{AuthUser, Session};
use crate::view;
use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_macros::{FromRequest, FromRequestParts};
use thiserror::Error;
use tracing::warn;

/// Cookie holding the auth service's access token
pub const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";
/// Cookie holding the signed-in user's ID
pub const USER_ID_COOKIE: &str = "sb-user-id";

/// Where requesters without a session get sent
pub const LOGIN_PATH: &str = "/login";

/// Wrapper for [axum::Form] which renders malformed submissions as an HTML error page
#[derive(FromRequest)]
#[from_request(via(axum::Form), rejection(InputErrorResponse))]
pub struct Form<T>(pub T);

/// Wrapper for [axum::extract::Query] which renders malformed query strings as an HTML error
/// page
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(InputErrorResponse))]
pub struct Query<T>(pub T);

/// Response type representing browser input that couldn't be decoded
pub struct InputErrorResponse {
    heading: &'static str,
    parse_problem: String,
}

impl From<FormRejection> for InputErrorResponse {
    fn from(value: FormRejection) -> Self {
        InputErrorResponse {
            heading: "The submitted form could not be read.",
            parse_problem: value.body_text(),
        }
    }
}

impl From<QueryRejection> for InputErrorResponse {
    fn from(value: QueryRejection) -> Self {
        InputErrorResponse {
            heading: "The page address could not be read.",
            parse_problem: value.body_text(),
        }
    }
}

impl IntoResponse for InputErrorResponse {
    fn into_response(self) -> Response {
        warn!("Rejected malformed input: {}", self.parse_problem);
        (
            StatusCode::BAD_REQUEST,
            Html(view::error_page(self.heading, &self.parse_problem)),
        )
            .into_response()
    }
}

/// Finds the value of the cookie called [name] in the request's Cookie headers
fn cookie_value<'headers>(headers: &'headers HeaderMap, name: &str) -> Option<&'headers str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(cookie_name, _)| *cookie_name == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// Rebuilds the session the browser stored at sign-in, if there is one
pub fn session_from_headers(headers: &HeaderMap) -> Option<Session> {
    let access_token = cookie_value(headers, ACCESS_TOKEN_COOKIE)?;
    let user = cookie_value(headers, USER_ID_COOKIE).map(|user_id| AuthUser {
        id: user_id.to_owned(),
        email: None,
    });

    Some(Session {
        access_token: access_token.to_owned(),
        user,
    })
}

/// A session value that can't be carried in a Set-Cookie header
#[derive(Debug, Error)]
#[error("the {cookie} cookie can't hold the value the auth service issued")]
pub struct CookieError {
    cookie: &'static str,
}

fn cookie_header(
    name: &'static str,
    value: &str,
    max_age: Option<u32>,
    secure: bool,
) -> Result<HeaderValue, CookieError> {
    let expiry = max_age
        .map(|seconds| format!("; Max-Age={seconds}"))
        .unwrap_or_default();
    let secure = if secure { "; Secure" } else { "" };
    HeaderValue::from_str(&format!(
        "{name}={value}; Path=/; HttpOnly; SameSite=Lax{secure}{expiry}"
    ))
    .map_err(|_| CookieError { cookie: name })
}

/// Set-Cookie headers storing [session] in the browser. [secure] restricts the cookies to
/// HTTPS.
pub fn session_cookies(session: &Session, secure: bool) -> Result<HeaderMap, CookieError> {
    let mut headers = HeaderMap::new();
    headers.append(
        SET_COOKIE,
        cookie_header(ACCESS_TOKEN_COOKIE, &session.access_token, None, secure)?,
    );
    if let Some(user_id) = session.user_id() {
        headers.append(
            SET_COOKIE,
            cookie_header(USER_ID_COOKIE, user_id, None, secure)?,
        );
    }

    Ok(headers)
}

/// Set-Cookie headers removing any stored session from the browser
pub fn clear_session_cookies(secure: bool) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for name in [ACCESS_TOKEN_COOKIE, USER_ID_COOKIE] {
        match cookie_header(name, "", Some(0), secure) {
            Ok(cookie) => {
                headers.append(SET_COOKIE, cookie);
            }
            Err(err) => warn!("Could not expire a session cookie: {err}"),
        }
    }

    headers
}

/// Sends the requester to the sign-in page
pub fn redirect_to_login() -> Response {
    Redirect::to(LOGIN_PATH).into_response()
}
