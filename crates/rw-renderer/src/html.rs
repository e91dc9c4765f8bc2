//! HTML serialization helpers shared by token renderers.

use std::fmt::Write;

/// Escape text for use in HTML content or a double-quoted attribute value.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Serialize attributes as ` name="value"` pairs, in order.
///
/// Values are escaped; names are written as given. Duplicate names are
/// serialized as many times as they occur.
///
/// # Example
///
/// ```
/// use rw_renderer::render_attrs;
///
/// let attrs = vec![
///     ("href".to_owned(), "a&b".to_owned()),
///     ("class".to_owned(), "link".to_owned()),
/// ];
/// assert_eq!(render_attrs(&attrs), r#" href="a&amp;b" class="link""#);
/// ```
pub fn render_attrs(attrs: &[(String, String)]) -> String {
    let mut out = String::new();
    for (name, value) in attrs {
        write!(out, r#" {name}="{}""#, escape_html(value)).unwrap();
    }
    out
}
