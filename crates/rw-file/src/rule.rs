//! Inline rule for the `{% file ... %}` syntax.

use rw_renderer::{InlineRule, Recognized, RenderEnv};

use crate::attrs::map_attrs;
use crate::consts::{ENV_FLAG_NAME, RULE_NAME};
use crate::lexer::lex;
use crate::token::file_token;

/// Recognizes `{% file src="..." name="..." %}` and emits file link tokens.
#[derive(Clone, Debug, Default)]
pub struct FileRule {
    extra_attrs: Vec<(String, String)>,
}

impl FileRule {
    /// Create a rule that appends `extra_attrs` to every link.
    #[must_use]
    pub fn new(extra_attrs: Vec<(String, String)>) -> Self {
        Self { extra_attrs }
    }
}

impl InlineRule for FileRule {
    fn name(&self) -> &'static str {
        RULE_NAME
    }

    fn marker(&self) -> char {
        '{'
    }

    fn try_recognize(&self, src: &str, pos: usize, env: &mut RenderEnv) -> Option<Recognized> {
        let lexed = lex(src, pos)?;
        let mapped = map_attrs(&lexed.attrs)?;

        env.set_flag(ENV_FLAG_NAME);

        Some(Recognized {
            token: file_token(mapped, &self.extra_attrs),
            consumed: lexed.consumed,
        })
    }
}
