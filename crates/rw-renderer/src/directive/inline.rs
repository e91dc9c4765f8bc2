//! Inline directive trait.

use super::DirectiveArgs;
use crate::{InlineToken, RenderEnv};

/// Handler for inline directives: `:name[content](dests){attrs}`
///
/// Handlers are registered on a [`DirectiveRule`](super::DirectiveRule) and
/// receive the parsed arguments of every directive with their name.
///
/// # Example
///
/// ```
/// use rw_renderer::directive::{DirectiveArgs, InlineDirective};
/// use rw_renderer::{InlineToken, RenderEnv};
///
/// struct KbdDirective;
///
/// impl InlineDirective for KbdDirective {
///     fn name(&self) -> &str { "kbd" }
///
///     fn process(&self, args: &DirectiveArgs, _env: &mut RenderEnv) -> Option<InlineToken> {
///         let mut token = InlineToken::new("kbd", ":kbd");
///         token.content = args.content.clone()?;
///         Some(token)
///     }
/// }
/// ```
pub trait InlineDirective: Send {
    /// Directive name, matched against `:name`.
    fn name(&self) -> &str;

    /// Turn the directive into a token, or return `None` to leave the source
    /// text unchanged.
    ///
    /// A handler that declines must not touch the environment.
    fn process(&self, args: &DirectiveArgs, env: &mut RenderEnv) -> Option<InlineToken>;
}
