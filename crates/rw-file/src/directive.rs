//! Handler for the `:file[name](link){attrs}` directive.

use rw_renderer::directive::{DirectiveArgs, InlineDirective};
use rw_renderer::{InlineToken, RenderEnv};

use crate::consts::{
    DIRECTIVE_ALLOWED_ATTRS, DIRECTIVE_MARKUP, DIRECTIVE_NAME, ENV_FLAG_NAME, FILE_TOKEN,
    LINK_CLASS,
};

/// Turns `:file[name](link){attrs}` into a file link token.
///
/// Both the `[name]` and `(link)` groups are required. From `{attrs}` only
/// the allow-listed link attributes are copied; ids and classes are ignored.
#[derive(Clone, Debug, Default)]
pub struct FileDirective {
    extra_attrs: Vec<(String, String)>,
}

impl FileDirective {
    /// Create a handler that sets `extra_attrs` on every link.
    #[must_use]
    pub fn new(extra_attrs: Vec<(String, String)>) -> Self {
        Self { extra_attrs }
    }
}

impl InlineDirective for FileDirective {
    fn name(&self) -> &'static str {
        DIRECTIVE_NAME
    }

    fn process(&self, args: &DirectiveArgs, env: &mut RenderEnv) -> Option<InlineToken> {
        let content = args.content.as_deref()?;
        let link = args.link()?;

        let mut token = InlineToken::new(FILE_TOKEN, DIRECTIVE_MARKUP);
        token.content = content.to_owned();
        token.attr_set("class", LINK_CLASS);
        token.attr_set("href", link);
        token.attr_set("download", content);

        for name in DIRECTIVE_ALLOWED_ATTRS {
            if let Some(value) = args.get(name).filter(|value| !value.is_empty()) {
                token.attr_set(name, value);
            }
        }

        // Unlike the bracket syntax, extra attributes replace same-named ones
        for (name, value) in &self.extra_attrs {
            token.attr_set(name.as_str(), value.as_str());
        }

        env.set_flag(ENV_FLAG_NAME);
        Some(token)
    }
}
