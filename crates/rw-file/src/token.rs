//! Token emitter shared by the bracket syntax.

use rw_renderer::InlineToken;

use crate::attrs::MappedAttrs;
use crate::consts::{FILE_TOKEN, LINK_CLASS, PREFIX};

/// Build the inline token for a validated bracket file link.
///
/// Attribute order: mapped attributes, then `class`, then `extra_attrs`
/// appended verbatim. Extra attributes are not deduplicated, so a name that
/// also appears earlier is serialized twice.
#[must_use]
pub fn file_token(mapped: MappedAttrs, extra_attrs: &[(String, String)]) -> InlineToken {
    let mut token = InlineToken::new(FILE_TOKEN, PREFIX);
    token.content = mapped.name;
    token.attrs = mapped.attrs;
    token.attr_set("class", LINK_CLASS);

    for (name, value) in extra_attrs {
        token.attr_push(name.clone(), value.clone());
    }

    token
}
