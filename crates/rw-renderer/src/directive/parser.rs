//! Inline directive syntax: `:name[content](dests){attrs}`.

use super::DirectiveArgs;

/// Inline directive found in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedInline {
    pub(crate) name: String,
    pub(crate) args: DirectiveArgs,
}

/// Parse an inline directive starting at byte `pos` of `src`.
///
/// `src[pos..]` must start with a single colon. At least one of the `[...]`,
/// `(...)` and `{...}` groups has to follow the name, otherwise plain prose
/// like `note:` or `10:30` would be taken for directives.
///
/// Returns the directive and the number of bytes consumed.
pub(crate) fn parse_inline(src: &str, pos: usize) -> Option<(ParsedInline, usize)> {
    let rest = src[pos..].strip_prefix(':')?;

    // `::name` is leaf syntax, and a colon right after another one is part of
    // that run rather than the start of a new directive
    if rest.starts_with(':') || src[..pos].ends_with(':') {
        return None;
    }

    let name_len = rest
        .find(|c: char| !is_name_char(c))
        .unwrap_or(rest.len());
    if name_len == 0 {
        return None;
    }
    let name = &rest[..name_len];
    let mut cursor = name_len;

    let content = enclosed(&rest[cursor..], '[', ']');
    if let Some((_, len)) = content {
        cursor += len;
    }
    let dests = enclosed(&rest[cursor..], '(', ')');
    if let Some((_, len)) = dests {
        cursor += len;
    }
    let attrs = enclosed(&rest[cursor..], '{', '}');
    if let Some((_, len)) = attrs {
        cursor += len;
    }

    if content.is_none() && dests.is_none() && attrs.is_none() {
        return None;
    }

    let args = DirectiveArgs::new(
        content.map(|(inner, _)| inner.to_owned()),
        dests.map(|(inner, _)| inner.to_owned()),
        attrs.map_or("", |(inner, _)| inner),
    );

    Some((
        ParsedInline {
            name: name.to_owned(),
            args,
        },
        1 + cursor,
    ))
}

/// Directive names are alphanumeric with hyphens and underscores.
fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

/// Balanced group at the start of `s`: `open ... close`, nesting allowed.
///
/// Returns the inner text and the byte length of the whole group.
fn enclosed(s: &str, open: char, close: char) -> Option<(&str, usize)> {
    if !s.starts_with(open) {
        return None;
    }

    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some((&s[open.len_utf8()..i], i + close.len_utf8()));
            }
        }
    }

    None
}
