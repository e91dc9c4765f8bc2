//! Validation and mapping of bracket syntax attributes to link attributes.

use crate::consts::{FILE_TO_LINK_ATTRS, KNOWN_ATTRS, REQUIRED_ATTRS};
use crate::lexer::RawAttribute;

/// Link attributes derived from a valid set of raw attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappedAttrs {
    /// Link attributes in first-occurrence order, already renamed.
    pub attrs: Vec<(String, String)>,
    /// Display name of the file (the `name` value).
    pub name: String,
}

/// Filter, deduplicate and rename raw attributes.
///
/// Unknown names are dropped. A repeated name keeps the position of its first
/// occurrence and the value of its last one. Returns `None` when a required
/// attribute is missing.
///
/// # Example
///
/// ```
/// use rw_file::{RawAttribute, map_attrs};
///
/// let raw = [
///     RawAttribute { name: "lang".into(), value: "en".into() },
///     RawAttribute { name: "foo".into(), value: "1".into() },
///     RawAttribute { name: "src".into(), value: "a.pdf".into() },
///     RawAttribute { name: "name".into(), value: "A".into() },
/// ];
/// let mapped = map_attrs(&raw).unwrap();
///
/// assert_eq!(mapped.name, "A");
/// assert_eq!(mapped.attrs[0], ("hreflang".to_owned(), "en".to_owned()));
/// assert_eq!(mapped.attrs.len(), 3);
/// ```
#[must_use]
pub fn map_attrs(raw: &[RawAttribute]) -> Option<MappedAttrs> {
    let mut known: Vec<(&str, &str)> = Vec::with_capacity(raw.len());

    for attr in raw {
        if attr.value.is_empty() || !KNOWN_ATTRS.contains(&attr.name.as_str()) {
            continue;
        }
        match known.iter_mut().find(|(name, _)| *name == attr.name) {
            Some(slot) => slot.1 = attr.value.as_str(),
            None => known.push((attr.name.as_str(), attr.value.as_str())),
        }
    }

    let has_required = REQUIRED_ATTRS
        .iter()
        .all(|required| known.iter().any(|(name, _)| name == required));
    if !has_required {
        return None;
    }

    let name = known
        .iter()
        .find(|(name, _)| *name == "name")
        .map(|(_, value)| (*value).to_owned())?;

    let attrs = known
        .into_iter()
        .map(|(name, value)| (link_attr_name(name).to_owned(), value.to_owned()))
        .collect();

    Some(MappedAttrs { attrs, name })
}

/// Link attribute name for a bracket syntax attribute name.
#[must_use]
pub fn link_attr_name(name: &str) -> &str {
    FILE_TO_LINK_ATTRS
        .iter()
        .find(|(file, _)| *file == name)
        .map_or(name, |&(_, link)| link)
}
