//! Attribute lexer for `{% file key="value" ... %}`.
//!
//! After the `{% file ` prefix the markup is a run of `key="value"` or
//! `key='value'` pairs, each preceded by whitespace (the prefix's own space
//! counts for the first pair), closed by optional whitespace and `%}`.
//! Values are non-empty and end at the next quote of the same kind, so `%}`
//! and the other quote kind are plain value text.

use std::sync::LazyLock;

use regex::Regex;

use crate::consts::PREFIX;

static PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s+([A-Za-z0-9_]+)=(?:"([^"]+)"|'([^']+)')"#).unwrap()
});

static CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*%\}").unwrap());

/// Attribute as written in the markup, before any validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawAttribute {
    /// Attribute name.
    pub name: String,
    /// Unquoted attribute value.
    pub value: String,
}

/// Successful lex of a bracket file link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexedFile {
    /// Attributes in source order, duplicates included.
    pub attrs: Vec<RawAttribute>,
    /// Bytes consumed from the start position, prefix and `%}` included.
    pub consumed: usize,
}

/// Lex a bracket file link starting at byte `pos` of `src`.
///
/// Returns `None` when the text at `pos` is not a well-formed file link; the
/// caller then leaves it as literal text.
///
/// # Example
///
/// ```
/// use rw_file::lex;
///
/// let src = r#"see {% file src="a.pdf" name='A' %}!"#;
/// let lexed = lex(src, 4).unwrap();
///
/// assert_eq!(lexed.attrs.len(), 2);
/// assert_eq!(lexed.attrs[1].value, "A");
/// assert_eq!(&src[4 + lexed.consumed..], "!");
/// ```
#[must_use]
pub fn lex(src: &str, pos: usize) -> Option<LexedFile> {
    let rest = src.get(pos..)?;
    if !rest.starts_with(PREFIX) {
        return None;
    }

    // Step back onto the prefix's trailing space so it separates the first pair
    let mut cursor = PREFIX.len() - 1;
    let mut attrs = Vec::new();

    while let Some(caps) = PAIR_RE.captures(&rest[cursor..]) {
        let value = caps.get(2).or_else(|| caps.get(3))?;
        attrs.push(RawAttribute {
            name: caps[1].to_owned(),
            value: value.as_str().to_owned(),
        });
        cursor += caps[0].len();
    }

    if attrs.is_empty() {
        return None;
    }

    let close = CLOSE_RE.find(&rest[cursor..])?;

    Some(LexedFile {
        attrs,
        consumed: cursor + close.end(),
    })
}
