//! HTML rendering of file link tokens.

use rw_renderer::{InlineToken, TokenRenderer, escape_html, render_attrs};

use crate::consts::{FILE_TOKEN, ICON_CLASS};

/// Renders `yfm_file` tokens as download anchors.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileRenderer;

impl TokenRenderer for FileRenderer {
    fn kind(&self) -> &'static str {
        FILE_TOKEN
    }

    fn render(&self, token: &InlineToken) -> String {
        render_file_link(token)
    }
}

/// Render a file link token.
///
/// Produces `<a{attrs}><span class="yfm-file__icon"></span>{name}</a>` with
/// every attribute value and the display name escaped.
///
/// # Example
///
/// ```
/// use rw_file::render_file_link;
/// use rw_renderer::InlineToken;
///
/// let mut token = InlineToken::new("yfm_file", "{% file ");
/// token.content = "a&b.txt".to_owned();
/// token.attr_push("href", "a&b.txt");
///
/// assert_eq!(
///     render_file_link(&token),
///     r#"<a href="a&amp;b.txt"><span class="yfm-file__icon"></span>a&amp;b.txt</a>"#
/// );
/// ```
#[must_use]
pub fn render_file_link(token: &InlineToken) -> String {
    format!(
        r#"<a{}><span class="{}"></span>{}</a>"#,
        render_attrs(&token.attrs),
        escape_html(ICON_CLASS),
        escape_html(&token.content)
    )
}
