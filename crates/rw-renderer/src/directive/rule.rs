//! Inline rule dispatching `:name` directives to registered handlers.

use super::InlineDirective;
use super::parser::parse_inline;
use crate::{InlineRule, Recognized, RenderEnv};

/// Inline rule for the generic directive syntax.
///
/// Parses `:name[content](dests){attrs}` and hands the arguments to the
/// handler registered under `name`. Unknown names and declining handlers
/// leave the text unchanged.
#[derive(Default)]
pub struct DirectiveRule {
    handlers: Vec<Box<dyn InlineDirective>>,
}

impl DirectiveRule {
    /// Create a rule with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an inline directive handler.
    ///
    /// A later handler with the same name replaces the earlier one.
    #[must_use]
    pub fn with_inline<D: InlineDirective + 'static>(mut self, handler: D) -> Self {
        self.register(Box::new(handler));
        self
    }

    /// Register an already boxed handler.
    pub fn register(&mut self, handler: Box<dyn InlineDirective>) {
        self.handlers.retain(|h| h.name() != handler.name());
        self.handlers.push(handler);
    }

    /// Whether any handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl InlineRule for DirectiveRule {
    fn name(&self) -> &'static str {
        "directive_inline"
    }

    fn marker(&self) -> char {
        ':'
    }

    fn try_recognize(&self, src: &str, pos: usize, env: &mut RenderEnv) -> Option<Recognized> {
        let (parsed, consumed) = parse_inline(src, pos)?;
        let handler = self.handlers.iter().find(|h| h.name() == parsed.name)?;
        let token = handler.process(&parsed.args, env)?;

        Some(Recognized { token, consumed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InlineToken;
    use crate::directive::DirectiveArgs;

    struct Kbd;

    impl InlineDirective for Kbd {
        fn name(&self) -> &'static str {
            "kbd"
        }

        fn process(&self, args: &DirectiveArgs, env: &mut RenderEnv) -> Option<InlineToken> {
            let mut token = InlineToken::new("kbd", ":kbd");
            token.content = args.content.clone()?;
            env.set_flag("kbd");
            Some(token)
        }
    }

    #[test]
    fn test_dispatches_to_handler() {
        let rule = DirectiveRule::new().with_inline(Kbd);
        let mut env = RenderEnv::new();

        let recognized = rule.try_recognize("Press :kbd[Esc].", 6, &mut env).unwrap();

        assert_eq!(recognized.token.content, "Esc");
        assert_eq!(recognized.consumed, 9);
        assert!(env.has_flag("kbd"));
    }

    #[test]
    fn test_unknown_name_declines() {
        let rule = DirectiveRule::new().with_inline(Kbd);
        let mut env = RenderEnv::new();

        assert!(rule.try_recognize(":abbr[HTML]", 0, &mut env).is_none());
    }

    #[test]
    fn test_declining_handler_leaves_env() {
        let rule = DirectiveRule::new().with_inline(Kbd);
        let mut env = RenderEnv::new();

        assert!(rule.try_recognize(":kbd{.x}", 0, &mut env).is_none());
        assert!(!env.has_flag("kbd"));
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut rule = DirectiveRule::new().with_inline(Kbd);
        rule.register(Box::new(Kbd));
        assert_eq!(rule.handlers.len(), 1);
        assert!(!rule.is_empty());
    }
}
