use axum::body;
use axum::http::header::{LOCATION, SET_COOKIE};
use axum::response::Response;

/// Used in tests to extract the HTML from a response body. Will panic and fail the test if the
/// body can't be read or isn't UTF-8.
pub async fn body_text(response_body: body::Body) -> String {
    let bytes = body::to_bytes(response_body, usize::MAX)
        .await
        .expect("Could not read data from response body!");

    String::from_utf8(bytes.to_vec()).unwrap_or_else(|err| {
        panic!("Response body was not UTF-8! Error: {err}, Received body: {bytes:?}")
    })
}

/// Where a redirect response points, if it's a redirect
pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
}

/// Every Set-Cookie header on the response
pub fn set_cookies(response: &Response) -> Vec<&str> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect()
}
