//! File download links for the RW markdown pipeline.
//!
//! Adds two inline syntaxes that render as download anchors:
//!
//! ```text
//! {% file src="files/report.pdf" name="report.pdf" lang="en" %}
//! :file[report.pdf](files/report.pdf){rel="nofollow"}
//! ```
//!
//! Both produce
//! `<a href=".." download=".." class="yfm-file"><span class="yfm-file__icon"></span>report.pdf</a>`.
//! Pages that contain a link get the runtime stylesheet in their metadata,
//! and with bundling enabled the stylesheet is copied to the output root.
//!
//! # Architecture
//!
//! - [`lex`] splits `{% file ... %}` markup into [`RawAttribute`]s.
//! - [`map_attrs`] keeps known attributes and renames them to link attributes.
//! - [`file_token`] builds the inline token, [`FileRenderer`] turns it into HTML.
//! - [`FileRule`] and [`FileDirective`] plug the two syntaxes into the pipeline.
//! - [`FileTransform`] validates options and registers everything, including
//!   [`FileAssetsRule`] for metadata and bundling.

mod attrs;
mod bundle;
pub mod consts;
mod directive;
mod error;
mod lexer;
mod render;
mod rule;
mod token;
mod transform;

pub use attrs::{MappedAttrs, link_attr_name, map_attrs};
pub use bundle::{RUNTIME_STYLE, RUNTIME_STYLE_KEY, copy_runtime};
pub use directive::FileDirective;
pub use error::FileError;
pub use lexer::{LexedFile, RawAttribute, lex};
pub use render::{FileRenderer, render_file_link};
pub use rule::FileRule;
pub use token::file_token;
pub use transform::{
    DirectiveSyntax, FileAssetsRule, FileTransform, OnBundle, PluginOptions, Runtime,
    RuntimeAssets, TransformOptions,
};
