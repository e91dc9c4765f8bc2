//! CLI command implementations.

pub(crate) mod collect;
pub(crate) mod render;

pub(crate) use collect::CollectArgs;
pub(crate) use render::RenderArgs;

use std::fs;
use std::path::Path;

use rw_config::Config;
use rw_file::{FileTransform, TransformOptions};

use crate::error::CliError;

/// Read a markdown source file.
fn read_markdown(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Build the file link transform from the loaded configuration.
///
/// Bundling copies the runtime stylesheet into the configured output root.
fn file_transform(config: &Config) -> Result<FileTransform, CliError> {
    let options = TransformOptions::from(&config.file_resolved);
    Ok(FileTransform::with_runtime_copy(options)?)
}
