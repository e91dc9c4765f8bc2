//! Configuration management for RW.
//!
//! Parses `rw.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## File links
//!
//! The `[file]` section configures the file download link extension:
//!
//! ```toml
//! [file]
//! bundle = true
//! runtime = { style = "_assets/file-extension.css" }
//! extra_attrs = [["data-yfm-file", "yes"]]
//! directive_syntax = "enabled"
//! output = "build"
//! ```
//!
//! `output` is resolved relative to the directory of the config file.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the destination root for bundled assets.
    pub output: Option<PathBuf>,
    /// Override asset bundling.
    pub bundle: Option<bool>,
    /// Override which file link syntaxes are recognized.
    pub directive_syntax: Option<DirectiveSyntax>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "rw.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Markdown rendering configuration.
    pub render: RenderConfig,
    /// File link configuration (paths are relative strings from TOML).
    file: FileConfigRaw,

    /// Resolved file link configuration (set after loading).
    #[serde(skip)]
    pub file_resolved: FileConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Markdown rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Enable GitHub Flavored Markdown (tables, strikethrough, task lists).
    pub gfm: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { gfm: true }
    }
}

/// Which file link syntaxes are recognized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectiveSyntax {
    /// Only `{% file ... %}`.
    #[default]
    Disabled,
    /// Both `{% file ... %}` and `:file[...](...)`.
    Enabled,
    /// Only `:file[...](...)`.
    Only,
}

impl DirectiveSyntax {
    /// Whether the `{% file ... %}` syntax is recognized.
    #[must_use]
    pub fn bracket(self) -> bool {
        self != Self::Only
    }

    /// Whether the `:file[...](...)` syntax is recognized.
    #[must_use]
    pub fn directive(self) -> bool {
        self != Self::Disabled
    }
}

impl FromStr for DirectiveSyntax {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disabled" => Ok(Self::Disabled),
            "enabled" => Ok(Self::Enabled),
            "only" => Ok(Self::Only),
            other => Err(ConfigError::Validation(format!(
                "unknown directive syntax mode `{other}` (expected disabled, enabled or only)"
            ))),
        }
    }
}

/// Stylesheet reference of the file link runtime.
///
/// Written either as a bare string or as a table with a `style` key.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RuntimeConfig {
    /// `runtime = "file-ext.css"`
    Path(String),
    /// `runtime = { style = "file-ext.css" }`
    Record {
        /// Stylesheet path relative to the output root.
        style: String,
    },
}

impl RuntimeConfig {
    /// Stylesheet reference regardless of the form it was written in.
    #[must_use]
    pub fn style(&self) -> &str {
        match self {
            Self::Path(style) | Self::Record { style } => style,
        }
    }
}

/// Raw file link configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileConfigRaw {
    bundle: Option<bool>,
    runtime: Option<RuntimeConfig>,
    extra_attrs: Option<Vec<(String, String)>>,
    directive_syntax: Option<DirectiveSyntax>,
    output: Option<String>,
}

/// Resolved file link configuration with absolute paths.
#[derive(Debug, Default)]
pub struct FileConfig {
    /// Copy the runtime stylesheet into `output` when a page uses file links.
    pub bundle: bool,
    /// Runtime stylesheet reference; `None` uses the extension default.
    pub runtime: Option<RuntimeConfig>,
    /// Static attributes added to every file link.
    pub extra_attrs: Vec<(String, String)>,
    /// Recognized syntaxes.
    pub directive_syntax: DirectiveSyntax,
    /// Destination root for bundled assets.
    pub output: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require an HTML attribute name to be serializable as-is.
fn require_attr_name(name: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(name, field)?;
    if name
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '>' | '/' | '='))
    {
        return Err(ConfigError::Validation(format!(
            "{field} `{name}` is not a valid attribute name"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `rw.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(output) = &settings.output {
            self.file_resolved.output.clone_from(output);
        }
        if let Some(bundle) = settings.bundle {
            self.file_resolved.bundle = bundle;
        }
        if let Some(directive_syntax) = settings.directive_syntax {
            self.file_resolved.directive_syntax = directive_syntax;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            render: RenderConfig::default(),
            file: FileConfigRaw::default(),
            file_resolved: FileConfig {
                bundle: true,
                runtime: None,
                extra_attrs: Vec::new(),
                directive_syntax: DirectiveSyntax::default(),
                output: base.to_path_buf(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading and resolution
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI settings
    /// are applied.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_file()
    }

    /// Validate file link configuration.
    fn validate_file(&self) -> Result<(), ConfigError> {
        let file = &self.file_resolved;

        if let Some(runtime) = &file.runtime {
            require_non_empty(runtime.style(), "file.runtime.style")?;

            if file.bundle && matches!(runtime, RuntimeConfig::Path(_)) {
                return Err(ConfigError::Validation(
                    "file.runtime must be a table with `style` when file.bundle is enabled"
                        .to_owned(),
                ));
            }
        }

        for (name, _) in &file.extra_attrs {
            require_attr_name(name, "file.extra_attrs")?;
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let raw = &self.file;
        self.file_resolved = FileConfig {
            bundle: raw.bundle.unwrap_or(true),
            runtime: raw.runtime.clone(),
            extra_attrs: raw.extra_attrs.clone().unwrap_or_default(),
            directive_syntax: raw.directive_syntax.unwrap_or_default(),
            output: raw
                .output
                .as_deref()
                .map_or_else(|| config_dir.to_path_buf(), |output| config_dir.join(output)),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(toml: &str, base: &Path) -> Config {
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(base);
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.render.gfm);
        assert!(config.file_resolved.bundle);
        assert_eq!(config.file_resolved.runtime, None);
        assert!(config.file_resolved.extra_attrs.is_empty());
        assert_eq!(
            config.file_resolved.directive_syntax,
            DirectiveSyntax::Disabled
        );
        assert_eq!(config.file_resolved.output, PathBuf::from("/test"));
    }

    #[test]
    fn test_default_impl_uses_current_dir() {
        let config = Config::default();
        assert!(config.config_path.is_none());
        assert_eq!(config.file_resolved.output, PathBuf::from("."));
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = parse("", Path::new("/project"));
        assert!(config.render.gfm);
        assert!(config.file_resolved.bundle);
        assert_eq!(config.file_resolved.output, PathBuf::from("/project"));
    }

    #[test]
    fn test_parse_render_config() {
        let config = parse("[render]\ngfm = false\n", Path::new("/project"));
        assert!(!config.render.gfm);
    }

    #[test]
    fn test_parse_file_config() {
        let toml = r#"
[file]
bundle = false
runtime = { style = "css/file.css" }
extra_attrs = [["data-yfm-file", "yes"], ["data-x", "1"]]
directive_syntax = "only"
output = "build"
"#;
        let config = parse(toml, Path::new("/project"));
        let file = &config.file_resolved;

        assert!(!file.bundle);
        assert_eq!(
            file.runtime,
            Some(RuntimeConfig::Record {
                style: "css/file.css".to_owned()
            })
        );
        assert_eq!(
            file.extra_attrs,
            vec![
                ("data-yfm-file".to_owned(), "yes".to_owned()),
                ("data-x".to_owned(), "1".to_owned()),
            ]
        );
        assert_eq!(file.directive_syntax, DirectiveSyntax::Only);
        assert_eq!(file.output, PathBuf::from("/project/build"));
    }

    #[test]
    fn test_parse_bare_string_runtime() {
        let toml = r#"
[file]
bundle = false
runtime = "file-ext"
"#;
        let config = parse(toml, Path::new("/project"));
        assert_eq!(
            config.file_resolved.runtime,
            Some(RuntimeConfig::Path("file-ext".to_owned()))
        );
        assert_eq!(config.file_resolved.runtime.unwrap().style(), "file-ext");
    }

    #[test]
    fn test_parse_unknown_directive_syntax_fails() {
        let result: Result<Config, _> = toml::from_str("[file]\ndirective_syntax = \"maybe\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_directive_syntax_modes() {
        assert!(DirectiveSyntax::Disabled.bracket());
        assert!(!DirectiveSyntax::Disabled.directive());
        assert!(DirectiveSyntax::Enabled.bracket());
        assert!(DirectiveSyntax::Enabled.directive());
        assert!(!DirectiveSyntax::Only.bracket());
        assert!(DirectiveSyntax::Only.directive());
    }

    #[test]
    fn test_directive_syntax_from_str() {
        assert_eq!(
            "enabled".parse::<DirectiveSyntax>().unwrap(),
            DirectiveSyntax::Enabled
        );
        let err = "yes".parse::<DirectiveSyntax>().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("yes"));
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[file]\noutput = \"out\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.file_resolved.output, dir.path().join("out"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = Config::load(Some(Path::new("/nonexistent/rw.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[file\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_apply_cli_settings_output() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            output: Some(PathBuf::from("/custom/out")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.file_resolved.output, PathBuf::from("/custom/out"));
        assert!(config.file_resolved.bundle); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_multiple() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            bundle: Some(false),
            directive_syntax: Some(DirectiveSyntax::Enabled),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert!(!config.file_resolved.bundle);
        assert_eq!(
            config.file_resolved.directive_syntax,
            DirectiveSyntax::Enabled
        );
        assert_eq!(config.file_resolved.output, PathBuf::from("/test")); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert!(config.file_resolved.bundle);
        assert_eq!(config.file_resolved.output, PathBuf::from("/test"));
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bare_runtime_with_bundle() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.file_resolved.runtime = Some(RuntimeConfig::Path("file-ext".to_owned()));
        assert_validation_error(&config, &["file.runtime", "file.bundle"]);
    }

    #[test]
    fn test_validate_bare_runtime_without_bundle() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.file_resolved.bundle = false;
        config.file_resolved.runtime = Some(RuntimeConfig::Path("file-ext".to_owned()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_runtime_style() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.file_resolved.runtime = Some(RuntimeConfig::Record {
            style: String::new(),
        });
        assert_validation_error(&config, &["file.runtime.style", "empty"]);
    }

    #[test]
    fn test_validate_extra_attr_name() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.file_resolved.extra_attrs = vec![("onclick=\"x\"".to_owned(), "y".to_owned())];
        assert_validation_error(&config, &["file.extra_attrs", "attribute name"]);
    }

    #[test]
    fn test_validate_empty_extra_attr_name() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.file_resolved.extra_attrs = vec![(String::new(), "y".to_owned())];
        assert_validation_error(&config, &["file.extra_attrs", "empty"]);
    }

    #[test]
    fn test_load_rejects_bare_runtime_with_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[file]\nruntime = \"file-ext\"\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_cli_settings_can_disable_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[file]\nbundle = false\nruntime = \"file-ext\"\n").unwrap();

        let settings = CliSettings {
            directive_syntax: Some(DirectiveSyntax::Only),
            ..Default::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert!(!config.file_resolved.bundle);
        assert_eq!(config.file_resolved.directive_syntax, DirectiveSyntax::Only);
    }
}
