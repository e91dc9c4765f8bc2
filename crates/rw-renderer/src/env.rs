//! Per-document render environment.
//!
//! A [`RenderEnv`] lives for exactly one document pass. Inline rules annotate
//! it while the source is scanned and core rules consume those annotations at
//! the end of the pass. Concurrent documents must each get their own value.

use std::collections::HashSet;

/// Page metadata accumulated while rendering a document.
///
/// Asset lists are append-only: extensions push references and nothing here
/// deduplicates them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PageMeta {
    /// Stylesheet references required by the rendered page.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub style: Option<Vec<String>>,
    /// Script references required by the rendered page.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub script: Option<Vec<String>>,
}

/// Mutable state threaded through a single document pass.
///
/// # Example
///
/// ```
/// use rw_renderer::RenderEnv;
///
/// let mut env = RenderEnv::new();
/// env.set_flag("has-widget");
/// env.meta_mut().style.get_or_insert_with(Vec::new).push("widget.css".to_owned());
///
/// assert!(env.has_flag("has-widget"));
/// assert_eq!(env.meta.unwrap().style.unwrap(), vec!["widget.css"]);
/// ```
#[derive(Debug, Default)]
pub struct RenderEnv {
    flags: HashSet<String>,
    /// Page metadata; `None` until some extension records something.
    pub meta: Option<PageMeta>,
    /// Identifiers of assets already copied during this pass.
    ///
    /// Created lazily by the first extension that bundles an asset.
    pub bundled: Option<HashSet<String>>,
}

impl RenderEnv {
    /// Create an empty environment for a new document pass.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark that something named `flag` happened during this pass.
    pub fn set_flag(&mut self, flag: &str) {
        if !self.flags.contains(flag) {
            self.flags.insert(flag.to_owned());
        }
    }

    /// Check whether `flag` was set during this pass.
    #[must_use]
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    /// Page metadata, created on first access.
    pub fn meta_mut(&mut self) -> &mut PageMeta {
        self.meta.get_or_insert_with(PageMeta::default)
    }

    /// Set of bundled asset identifiers, created on first access.
    pub fn bundled_mut(&mut self) -> &mut HashSet<String> {
        self.bundled.get_or_insert_with(HashSet::new)
    }
}
