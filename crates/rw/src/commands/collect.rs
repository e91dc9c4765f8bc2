//! `rw collect` command implementation.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use rw_config::{CliSettings, Config};

use super::{file_transform, read_markdown};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the collect command.
#[derive(Args)]
pub(crate) struct CollectArgs {
    /// Markdown file to scan.
    input: PathBuf,

    /// Destination root for bundled assets (overrides config).
    #[arg(long)]
    dest_root: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover rw.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl CollectArgs {
    /// Execute the collect command.
    ///
    /// Prints the page metadata as JSON on stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, reading the input or
    /// bundling fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            output: self.dest_root.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let markdown = read_markdown(&self.input)?;
        let transform = file_transform(&config)?;
        let env = transform.collect(&markdown, &config.file_resolved.output)?;

        let Some(meta) = env.meta else {
            output.warning(&format!("No file links in {}", self.input.display()));
            return Ok(());
        };

        let mut stdout = io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &meta)?;
        writeln!(stdout)?;

        if env.bundled.is_some() {
            output.success(&format!(
                "Bundled assets into {}",
                config.file_resolved.output.display()
            ));
        }

        Ok(())
    }
}
