//! Generic inline directive syntax.
//!
//! Extensions that want a `:name[content](dests){attrs}` syntax implement
//! [`InlineDirective`] and register it on the pipeline with
//! [`MarkdownPipeline::with_inline_directive`](crate::MarkdownPipeline::with_inline_directive).
//! All handlers share one [`DirectiveRule`], which does the parsing and the
//! dispatch by name.
//!
//! # Example
//!
//! ```
//! use rw_renderer::directive::{DirectiveArgs, InlineDirective};
//! use rw_renderer::{InlineToken, MarkdownPipeline, RenderEnv, TokenRenderer, escape_html};
//!
//! struct Kbd;
//!
//! impl InlineDirective for Kbd {
//!     fn name(&self) -> &str { "kbd" }
//!
//!     fn process(&self, args: &DirectiveArgs, _env: &mut RenderEnv) -> Option<InlineToken> {
//!         let mut token = InlineToken::new("kbd", ":kbd");
//!         token.content = args.content.clone()?;
//!         Some(token)
//!     }
//! }
//!
//! struct KbdRenderer;
//!
//! impl TokenRenderer for KbdRenderer {
//!     fn kind(&self) -> &str { "kbd" }
//!
//!     fn render(&self, token: &InlineToken) -> String {
//!         format!("<kbd>{}</kbd>", escape_html(&token.content))
//!     }
//! }
//!
//! let mut pipeline = MarkdownPipeline::new()
//!     .with_inline_directive(Kbd)
//!     .with_renderer(KbdRenderer);
//!
//! let html = pipeline.process("Press :kbd[Ctrl+C] to copy.", &mut RenderEnv::new()).unwrap();
//! assert_eq!(html, "<p>Press <kbd>Ctrl+C</kbd> to copy.</p>\n");
//! ```

mod args;
mod inline;
mod parser;
mod rule;

pub use args::DirectiveArgs;
pub use inline::InlineDirective;
pub use rule::DirectiveRule;
