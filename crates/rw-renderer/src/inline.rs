//! Extension seams of the pipeline.
//!
//! An extension plugs in through three traits:
//!
//! - [`InlineRule`]: tries to recognize a span at a cursor and turns it into an
//!   [`InlineToken`].
//! - [`TokenRenderer`]: turns tokens of one kind into HTML.
//! - [`CoreRule`]: runs once at the end of each parse pass.

use crate::{RenderEnv, RenderError};

/// Abstract inline token produced during scanning and rendered later.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineToken {
    /// Token kind, used to find the renderer (e.g., `"yfm_file"`).
    pub kind: &'static str,
    /// Markup that introduced the token (e.g., `"{% file "`).
    pub markup: String,
    /// Text content of the token.
    pub content: String,
    /// Ordered attribute pairs.
    pub attrs: Vec<(String, String)>,
    /// Whether the token is a block (inline rules always emit `false`).
    pub block: bool,
}

impl InlineToken {
    /// Create an empty inline token.
    #[must_use]
    pub fn new(kind: &'static str, markup: impl Into<String>) -> Self {
        Self {
            kind,
            markup: markup.into(),
            content: String::new(),
            attrs: Vec::new(),
            block: false,
        }
    }

    /// Value of the first attribute named `name`.
    #[must_use]
    pub fn attr_get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, overwriting the first existing one with the same name
    /// in place, or appending it.
    pub fn attr_set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// Append an attribute without looking for an existing one.
    pub fn attr_push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.push((name.into(), value.into()));
    }
}

/// A token recognized by an [`InlineRule`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recognized {
    /// The emitted token.
    pub token: InlineToken,
    /// Number of source bytes consumed, starting at the cursor.
    pub consumed: usize,
}

/// Recognizer for one inline syntax.
///
/// Rules are offered every occurrence of their [`marker`](Self::marker)
/// character in inline text: never inside code, raw HTML or entity references,
/// and never on a backslash-escaped character. A rule that declines returns `None` and must leave
/// the environment untouched; the text then stays literal.
pub trait InlineRule: Send {
    /// Rule name, used in logs.
    fn name(&self) -> &str;

    /// First character of the syntax; the rule is only tried there.
    fn marker(&self) -> char;

    /// Try to recognize a span starting at byte offset `pos` of `src`.
    ///
    /// `src` ends at the scan boundary, the end of the enclosing paragraph,
    /// heading, table cell or list item. It may contain line breaks.
    fn try_recognize(&self, src: &str, pos: usize, env: &mut RenderEnv) -> Option<Recognized>;
}

/// Renderer for tokens of a single kind.
///
/// Rendering must be pure: the same token always yields the same HTML.
pub trait TokenRenderer: Send {
    /// Token kind handled by this renderer.
    fn kind(&self) -> &str;

    /// Render a token to HTML.
    fn render(&self, token: &InlineToken) -> String;
}

/// Hook run once at the end of every parse pass.
pub trait CoreRule: Send {
    /// Rule name, used in logs.
    fn name(&self) -> &str;

    /// Inspect and update the environment of the finished pass.
    fn run(&mut self, env: &mut RenderEnv) -> Result<(), RenderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_set_appends_new() {
        let mut token = InlineToken::new("test", "");
        token.attr_set("href", "a");
        token.attr_set("class", "b");
        assert_eq!(
            token.attrs,
            vec![
                ("href".to_owned(), "a".to_owned()),
                ("class".to_owned(), "b".to_owned()),
            ]
        );
    }

    #[test]
    fn test_attr_set_overwrites_in_place() {
        let mut token = InlineToken::new("test", "");
        token.attr_set("href", "a");
        token.attr_set("class", "b");
        token.attr_set("href", "c");
        assert_eq!(token.attrs[0], ("href".to_owned(), "c".to_owned()));
        assert_eq!(token.attrs.len(), 2);
    }

    #[test]
    fn test_attr_push_keeps_duplicates() {
        let mut token = InlineToken::new("test", "");
        token.attr_push("data-x", "1");
        token.attr_push("data-x", "2");
        assert_eq!(token.attrs.len(), 2);
        assert_eq!(token.attr_get("data-x"), Some("1"));
    }

    #[test]
    fn test_new_token_is_inline() {
        let token = InlineToken::new("test", ":test");
        assert!(!token.block);
        assert_eq!(token.markup, ":test");
        assert!(token.content.is_empty());
    }
}
