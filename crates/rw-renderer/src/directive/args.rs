//! Parsed directive arguments.

use std::collections::HashMap;

/// Arguments of an inline directive: `:name[content](dests){attrs}`.
///
/// Each group is optional in the syntax, so presence is tracked separately
/// from emptiness: `:name[]` has `Some("")` content, `:name` has `None`.
///
/// # Example
///
/// ```
/// use rw_renderer::directive::DirectiveArgs;
///
/// let args = DirectiveArgs::new(
///     Some("report.pdf".to_owned()),
///     Some("files/report.pdf".to_owned()),
///     r#"#dl .primary rel="nofollow" target=_blank"#,
/// );
/// assert_eq!(args.link(), Some("files/report.pdf"));
/// assert_eq!(args.id.as_deref(), Some("dl"));
/// assert_eq!(args.classes, vec!["primary"]);
/// assert_eq!(args.get("rel"), Some("nofollow"));
/// assert_eq!(args.get("target"), Some("_blank"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectiveArgs {
    /// Raw content of `[...]`.
    pub content: Option<String>,
    /// Raw content of `(...)`.
    pub dests: Option<String>,
    /// `#id` from `{...}`.
    pub id: Option<String>,
    /// `.class` entries from `{...}`, in order.
    pub classes: Vec<String>,
    /// `key=value` entries from `{...}`; a repeated key keeps the last value.
    pub attrs: HashMap<String, String>,
}

impl DirectiveArgs {
    /// Build arguments from the raw groups, parsing the attribute string.
    #[must_use]
    pub fn new(content: Option<String>, dests: Option<String>, attrs: &str) -> Self {
        let mut args = Self {
            content,
            dests,
            ..Self::default()
        };
        args.parse_attrs(attrs);
        args
    }

    /// Link destination: the first whitespace-separated word of `(...)`.
    ///
    /// Empty parentheses give an empty link; no parentheses give `None`.
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        self.dests
            .as_deref()
            .map(|dests| dests.split_whitespace().next().unwrap_or_default())
    }

    /// Attribute value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    fn parse_attrs(&mut self, input: &str) {
        let mut rest = input.trim_start();

        while let Some(first) = rest.chars().next() {
            rest = match first {
                '#' | '.' => {
                    let body = &rest[1..];
                    let end = body
                        .find(|c: char| c.is_whitespace() || c == '#' || c == '.')
                        .unwrap_or(body.len());
                    let word = &body[..end];
                    if !word.is_empty() {
                        if first == '#' {
                            self.id = Some(word.to_owned());
                        } else {
                            self.classes.push(word.to_owned());
                        }
                    }
                    &body[end..]
                }
                _ => match split_key_value(rest) {
                    Some((key, value, after)) => {
                        self.attrs.insert(key.to_owned(), value.to_owned());
                        after
                    }
                    // Skip one unrecognized character
                    None => &rest[first.len_utf8()..],
                },
            }
            .trim_start();
        }
    }
}

/// Split `key=value` off the front of `s`.
///
/// Values may be double-quoted, single-quoted or bare (up to whitespace).
/// Returns `(key, value, rest)`.
fn split_key_value(s: &str) -> Option<(&str, &str, &str)> {
    let key_end = s.find(|c: char| c == '=' || c.is_whitespace())?;
    if !s[key_end..].starts_with('=') || key_end == 0 {
        return None;
    }
    let key = &s[..key_end];
    let value_start = &s[key_end + 1..];

    match value_start.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let body = &value_start[1..];
            let close = body.find(quote)?;
            Some((key, &body[..close], &body[close + 1..]))
        }
        _ => {
            let end = value_start
                .find(char::is_whitespace)
                .unwrap_or(value_start.len());
            Some((key, &value_start[..end], &value_start[end..]))
        }
    }
}
