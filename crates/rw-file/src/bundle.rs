//! Copying the runtime stylesheet next to rendered pages.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use crate::transform::RuntimeAssets;

/// Identifier of the runtime stylesheet in the bundled asset set.
pub const RUNTIME_STYLE_KEY: &str = "runtime/index.css";

/// Stylesheet shipped with the extension.
pub const RUNTIME_STYLE: &str = include_str!("../assets/file-extension.css");

/// Write the runtime stylesheet to `output/<runtime.style>`.
///
/// `bundled` deduplicates copies within one document pass: once the key is
/// recorded the call is a no-op. The key is recorded before writing, so a
/// failed copy is not retried in the same pass.
///
/// # Errors
///
/// Returns the I/O error from creating the parent directories or writing the
/// file.
pub fn copy_runtime(
    bundled: &mut HashSet<String>,
    output: &Path,
    runtime: &RuntimeAssets,
) -> io::Result<()> {
    if !bundled.insert(RUNTIME_STYLE_KEY.to_owned()) {
        return Ok(());
    }

    let target = output.join(&runtime.style);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, RUNTIME_STYLE)?;

    tracing::info!(path = %target.display(), "Copied file link stylesheet");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn runtime(style: &str) -> RuntimeAssets {
        RuntimeAssets {
            style: style.to_owned(),
        }
    }

    #[test]
    fn test_copy_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let mut bundled = HashSet::new();

        copy_runtime(&mut bundled, dir.path(), &runtime("_assets/file-extension.css")).unwrap();

        let written = fs::read_to_string(dir.path().join("_assets/file-extension.css")).unwrap();
        assert_eq!(written, RUNTIME_STYLE);
        assert!(bundled.contains(RUNTIME_STYLE_KEY));
    }

    #[test]
    fn test_copy_once_per_set() {
        let dir = tempfile::tempdir().unwrap();
        let mut bundled = HashSet::new();
        let target = dir.path().join("file.css");

        copy_runtime(&mut bundled, dir.path(), &runtime("file.css")).unwrap();
        fs::write(&target, "changed").unwrap();
        copy_runtime(&mut bundled, dir.path(), &runtime("file.css")).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "changed");
    }

    #[test]
    fn test_copy_error_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let mut bundled = HashSet::new();

        let result = copy_runtime(&mut bundled, &blocker, &runtime("css/file.css"));

        assert!(result.is_err());
    }

    #[test]
    fn test_stylesheet_targets_link_classes() {
        assert!(RUNTIME_STYLE.contains(".yfm-file"));
        assert!(RUNTIME_STYLE.contains(".yfm-file__icon"));
    }
}
