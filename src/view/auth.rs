use super::{escape, layout};

/// The sign-in page, optionally showing why the last attempt failed
pub fn render_login(email: &str, error: Option<&str>) -> String {
    let error = error
        .map(|message| format!("<p class=\"error\">{}</p>", escape(message)))
        .unwrap_or_default();

    layout(
        "Sign in",
        &format!(
            "<h1>Sign in</h1>\
<form method=\"post\" action=\"/login\">\
<div><label for=\"email\">Email</label>\
<input id=\"email\" type=\"email\" name=\"email\" value=\"{email}\" required></div>\
<div><label for=\"password\">Password</label>\
<input id=\"password\" type=\"password\" name=\"password\" required></div>\
{error}\
<button type=\"submit\">Sign in</button>\
</form>",
            email = escape(email),
        ),
    )
}
