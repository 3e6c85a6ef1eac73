/// Overlays [content] on top of the page with a close control that leads to [close_href]
pub fn render_modal(content: &str, close_href: &str) -> String {
    format!(
        "<div class=\"modal-backdrop\"><div class=\"modal\" role=\"dialog\" aria-modal=\"true\">\
<a class=\"modal-close\" href=\"{close}\" aria-label=\"Close\">✖</a>{content}</div></div>",
        close = super::escape(close_href),
    )
}
