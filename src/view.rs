//! Server-side HTML rendering. Every piece of user-supplied text passes through [escape]
//! before it lands in markup.

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

pub mod auth;
pub mod dashboard;
pub mod modal;
pub mod task_form;

const STYLES: &str = "body{font-family:sans-serif;margin:0;background:#f9fafb}\
main{max-width:56rem;margin:0 auto;padding:1.5rem}\
table{width:100%;border-collapse:collapse;border:1px solid #e5e7eb;background:#fff}\
th,td{padding:.5rem;text-align:left;border-top:1px solid #e5e7eb}\
button:disabled{opacity:.5}\
.modal-backdrop{position:fixed;inset:0;background:rgba(0,0,0,.5);display:flex;justify-content:center;align-items:center}\
.modal{background:#fff;padding:1.5rem;border-radius:.25rem;width:100%;max-width:28rem;position:relative}\
.modal-close{position:absolute;top:.5rem;right:.5rem;color:#6b7280;text-decoration:none}\
.error{color:#dc2626;font-size:.875rem}";

/// Escapes text for use in HTML element content and quoted attribute values
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }

    escaped
}

/// Percent-encodes text for use as a single path segment or query value in a link
pub fn url_component(text: &str) -> String {
    utf8_percent_encode(text, NON_ALPHANUMERIC).to_string()
}

/// Wraps already-rendered [body] markup in a complete HTML document
pub fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\
<html lang=\"en\">\
<head><meta charset=\"utf-8\"><meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<title>{title}</title><style>{STYLES}</style></head>\
<body><main>{body}</main></body>\
</html>",
        title = escape(title),
    )
}

/// A standalone page explaining that a request couldn't be handled
pub fn error_page(heading: &str, detail: &str) -> String {
    layout(
        "Error",
        &format!(
            "<h1>{}</h1><p class=\"error\">{}</p><p><a href=\"/dashboard\">Back to the dashboard</a></p>",
            escape(heading),
            escape(detail)
        ),
    )
}
