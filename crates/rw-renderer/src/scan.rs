//! Code-aware source scanning.
//!
//! Inline rules may only fire where CommonMark itself sees inline text. A
//! first pulldown-cmark pass over the source maps out those places: every
//! `Text` event outside code blocks, inside a paragraph, heading, table cell
//! or list item. Code spans, code blocks (fenced and indented), raw HTML and
//! entity references produce other events or decoded text and are never
//! offered to the rules, and a backslash-escaped character cannot start a
//! token.

use std::ops::Range;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Source range where inline rules may start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TextRun {
    /// Byte range of literal text in the source.
    pub(crate) range: Range<usize>,
    /// End of the enclosing inline block; a token must not extend past it.
    pub(crate) bound: usize,
}

/// Map out the inline text of `source`, in document order.
pub(crate) fn text_runs(source: &str, options: Options) -> Vec<TextRun> {
    let mut runs = Vec::new();
    let mut blocks: Vec<usize> = Vec::new();
    let mut code_depth = 0usize;

    for (event, range) in Parser::new_ext(source, options).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(_)) => code_depth += 1,
            Event::End(TagEnd::CodeBlock) => code_depth = code_depth.saturating_sub(1),
            Event::Start(Tag::Paragraph | Tag::Heading { .. } | Tag::TableCell | Tag::Item) => {
                blocks.push(range.end);
            }
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::TableCell | TagEnd::Item) => {
                blocks.pop();
            }
            Event::Text(text) if code_depth == 0 => {
                let Some(&bound) = blocks.last() else {
                    continue;
                };
                // Decoded entities no longer match their source
                if source.get(range.clone()) != Some(&*text) {
                    continue;
                }

                let mut start = range.start;
                if is_escaped(source, start) {
                    start += text.chars().next().map_or(0, char::len_utf8);
                }
                if start < range.end {
                    runs.push(TextRun {
                        range: start..range.end,
                        bound: bound.max(range.end),
                    });
                }
            }
            _ => {}
        }
    }

    runs
}

/// Whether the character at `pos` follows a backslash that escapes it.
///
/// pulldown-cmark starts a new text node right after an escaping backslash,
/// so only the first character of a node can be escaped.
fn is_escaped(source: &str, pos: usize) -> bool {
    let bytes = source.as_bytes();
    pos > 0
        && bytes[pos - 1] == b'\\'
        && bytes.get(pos).is_some_and(u8::is_ascii_punctuation)
}
