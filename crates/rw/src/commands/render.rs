//! `rw render` command implementation.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use rw_config::{CliSettings, Config, DirectiveSyntax};
use rw_file::PluginOptions;
use rw_renderer::{MarkdownPipeline, PageMeta, RenderEnv};
use serde::Serialize;

use super::{file_transform, read_markdown};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render.
    input: PathBuf,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Destination root for bundled assets (overrides config).
    #[arg(long)]
    dest_root: Option<PathBuf>,

    /// Do not copy the file link stylesheet.
    #[arg(long)]
    no_bundle: bool,

    /// Recognized file link syntaxes: disabled, enabled or only (overrides config).
    #[arg(long, value_name = "MODE")]
    directive_syntax: Option<DirectiveSyntax>,

    /// Emit a JSON object with the HTML and the page metadata.
    #[arg(long)]
    meta: bool,

    /// Path to configuration file (default: auto-discover rw.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

/// Rendered page as emitted by `--meta`.
#[derive(Serialize)]
struct RenderedPage<'a> {
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<&'a PageMeta>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, reading the input, bundling
    /// or writing the result fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            output: self.dest_root.clone(),
            bundle: self.no_bundle.then_some(false),
            directive_syntax: self.directive_syntax,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let markdown = read_markdown(&self.input)?;
        tracing::info!(input = %self.input.display(), "Rendering");

        let transform = file_transform(&config)?;
        let plugin = PluginOptions {
            output: config.file_resolved.output.clone(),
            extra_attrs: None,
        };
        let mut pipeline =
            transform.apply(MarkdownPipeline::new().with_gfm(config.render.gfm), &plugin);

        let mut env = RenderEnv::new();
        let html = pipeline.process(&markdown, &mut env)?;

        let rendered = if self.meta {
            let page = RenderedPage {
                html: &html,
                meta: env.meta.as_ref(),
            };
            let mut json = serde_json::to_string_pretty(&page)?;
            json.push('\n');
            json
        } else {
            html
        };

        match &self.output {
            Some(path) => {
                fs::write(path, rendered)?;
                output.success(&format!(
                    "Rendered {} -> {}",
                    self.input.display(),
                    path.display()
                ));
            }
            None => io::stdout().lock().write_all(rendered.as_bytes())?,
        }

        if env.bundled.is_some() {
            output.info(&format!(
                "Assets: {}",
                config.file_resolved.output.display()
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rendered_page_json() {
        let meta = PageMeta {
            style: Some(vec!["_assets/file-extension.css".to_owned()]),
            script: None,
        };
        let page = RenderedPage {
            html: "<p>x</p>\n",
            meta: Some(&meta),
        };

        assert_eq!(
            serde_json::to_string(&page).unwrap(),
            r#"{"html":"<p>x</p>\n","meta":{"style":["_assets/file-extension.css"]}}"#
        );
    }

    #[test]
    fn test_rendered_page_json_without_meta() {
        let page = RenderedPage {
            html: "",
            meta: None,
        };
        assert_eq!(serde_json::to_string(&page).unwrap(), r#"{"html":""}"#);
    }
}
