//! Markdown rendering pipeline with pluggable inline extensions.
//!
//! [`MarkdownPipeline`] renders CommonMark (with optional GFM) through
//! pulldown-cmark and lets extensions add inline syntax on top of it.
//!
//! # Architecture
//!
//! Rendering happens in two passes over a per-document [`RenderEnv`]:
//!
//! - **Parse**: [`InlineRule`]s recognize spans outside code and emit
//!   [`InlineToken`]s, then [`CoreRule`]s run once over the environment.
//! - **Render**: markdown is rendered to HTML and every token is rendered by
//!   the [`TokenRenderer`] registered for its kind.
//!
//! The generic `:name[content](dests){attrs}` syntax lives in [`directive`].
//!
//! # Example
//!
//! ```
//! use rw_renderer::{MarkdownPipeline, RenderEnv};
//!
//! let mut pipeline = MarkdownPipeline::new().with_gfm(false);
//! let mut env = RenderEnv::new();
//! let html = pipeline.process("# Hello\n\n**Bold** text", &mut env).unwrap();
//!
//! assert_eq!(html, "<h1>Hello</h1>\n<p><strong>Bold</strong> text</p>\n");
//! ```

pub mod directive;
mod env;
mod error;
mod html;
mod inline;
mod pipeline;
mod scan;

pub use env::{PageMeta, RenderEnv};
pub use error::RenderError;
pub use html::{escape_html, render_attrs};
pub use inline::{CoreRule, InlineRule, InlineToken, Recognized, TokenRenderer};
pub use pipeline::{MarkdownPipeline, ParsedDocument};
