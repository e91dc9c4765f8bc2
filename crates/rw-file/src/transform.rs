//! Wiring the file link extension into a [`MarkdownPipeline`].
//!
//! [`FileTransform`] validates the options once and can then be applied to
//! any number of pipelines. Each application registers:
//!
//! - [`FileRule`] and/or [`FileDirective`], depending on [`DirectiveSyntax`]
//! - [`FileRenderer`]
//! - [`FileAssetsRule`], which records the runtime stylesheet in the page
//!   metadata and triggers bundling at the end of every parse pass

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rw_config::{FileConfig, RuntimeConfig};
use rw_renderer::{CoreRule, MarkdownPipeline, RenderEnv, RenderError};

use crate::bundle::copy_runtime;
use crate::consts::{ASSETS_RULE_NAME, DEFAULT_RUNTIME_STYLE, ENV_FLAG_NAME};
use crate::directive::FileDirective;
use crate::error::FileError;
use crate::render::FileRenderer;
use crate::rule::FileRule;

pub use rw_config::DirectiveSyntax;

/// Callback invoked when a page with file links is bundled.
///
/// Receives the pass environment (with `bundled` already created), the
/// output root and the runtime assets.
pub type OnBundle =
    dyn Fn(&mut RenderEnv, &Path, &RuntimeAssets) -> Result<(), RenderError> + Send + Sync;

/// Runtime assets referenced by pages that contain file links.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeAssets {
    /// Stylesheet path, relative to the output root.
    pub style: String,
}

impl Default for RuntimeAssets {
    fn default() -> Self {
        Self {
            style: DEFAULT_RUNTIME_STYLE.to_owned(),
        }
    }
}

/// Runtime stylesheet as supplied by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Runtime {
    /// Bare stylesheet reference. Only usable without bundling.
    Path(String),
    /// Full runtime description.
    Record(RuntimeAssets),
}

impl From<&RuntimeConfig> for Runtime {
    fn from(config: &RuntimeConfig) -> Self {
        match config {
            RuntimeConfig::Path(style) => Self::Path(style.clone()),
            RuntimeConfig::Record { style } => Self::Record(RuntimeAssets {
                style: style.clone(),
            }),
        }
    }
}

/// Options for [`FileTransform::new`].
#[derive(Clone)]
pub struct TransformOptions {
    /// Runtime stylesheet; `None` means [`RuntimeAssets::default`].
    pub runtime: Option<Runtime>,
    /// Call `on_bundle` for pages with file links. Defaults to `true`.
    pub bundle: bool,
    /// Static attributes added to every link.
    pub extra_attrs: Option<Vec<(String, String)>>,
    /// Recognized syntaxes.
    pub directive_syntax: DirectiveSyntax,
    /// Bundling callback.
    pub on_bundle: Option<Arc<OnBundle>>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            runtime: None,
            bundle: true,
            extra_attrs: None,
            directive_syntax: DirectiveSyntax::default(),
            on_bundle: None,
        }
    }
}

impl fmt::Debug for TransformOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformOptions")
            .field("runtime", &self.runtime)
            .field("bundle", &self.bundle)
            .field("extra_attrs", &self.extra_attrs)
            .field("directive_syntax", &self.directive_syntax)
            .field("on_bundle", &self.on_bundle.is_some())
            .finish()
    }
}

impl TransformOptions {
    /// Set the runtime stylesheet.
    #[must_use]
    pub fn with_runtime(mut self, runtime: Runtime) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Enable or disable bundling.
    #[must_use]
    pub fn with_bundle(mut self, bundle: bool) -> Self {
        self.bundle = bundle;
        self
    }

    /// Set static attributes added to every link.
    #[must_use]
    pub fn with_extra_attrs(mut self, extra_attrs: Vec<(String, String)>) -> Self {
        self.extra_attrs = Some(extra_attrs);
        self
    }

    /// Choose the recognized syntaxes.
    #[must_use]
    pub fn with_directive_syntax(mut self, directive_syntax: DirectiveSyntax) -> Self {
        self.directive_syntax = directive_syntax;
        self
    }

    /// Set the bundling callback.
    #[must_use]
    pub fn with_on_bundle<F>(mut self, on_bundle: F) -> Self
    where
        F: Fn(&mut RenderEnv, &Path, &RuntimeAssets) -> Result<(), RenderError>
            + Send
            + Sync
            + 'static,
    {
        self.on_bundle = Some(Arc::new(on_bundle));
        self
    }
}

impl From<&FileConfig> for TransformOptions {
    fn from(config: &FileConfig) -> Self {
        Self {
            runtime: config.runtime.as_ref().map(Runtime::from),
            bundle: config.bundle,
            extra_attrs: (!config.extra_attrs.is_empty()).then(|| config.extra_attrs.clone()),
            directive_syntax: config.directive_syntax,
            on_bundle: None,
        }
    }
}

/// Per-pipeline options for [`FileTransform::apply`].
#[derive(Clone, Debug)]
pub struct PluginOptions {
    /// Output root handed to the bundling callback.
    pub output: PathBuf,
    /// Static attributes; replace the transform's `extra_attrs` when set.
    pub extra_attrs: Option<Vec<(String, String)>>,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from("."),
            extra_attrs: None,
        }
    }
}

/// Configured file link extension.
///
/// # Example
///
/// ```
/// use rw_file::{FileTransform, PluginOptions, TransformOptions};
/// use rw_renderer::{MarkdownPipeline, RenderEnv};
///
/// let transform = FileTransform::new(TransformOptions::default().with_bundle(false))?;
/// let mut pipeline = transform.apply(MarkdownPipeline::new(), &PluginOptions::default());
///
/// let mut env = RenderEnv::new();
/// let html = pipeline.process(r#"{% file src="a.pdf" name="A" %}"#, &mut env)?;
///
/// assert_eq!(
///     html,
///     "<p><a href=\"a.pdf\" download=\"A\" class=\"yfm-file\"><span class=\"yfm-file__icon\"></span>A</a></p>\n"
/// );
/// assert_eq!(env.meta.unwrap().style.unwrap(), vec!["_assets/file-extension.css"]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone)]
pub struct FileTransform {
    bundle: bool,
    runtime: RuntimeAssets,
    extra_attrs: Option<Vec<(String, String)>>,
    directive_syntax: DirectiveSyntax,
    on_bundle: Option<Arc<OnBundle>>,
}

impl fmt::Debug for FileTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileTransform")
            .field("bundle", &self.bundle)
            .field("runtime", &self.runtime)
            .field("extra_attrs", &self.extra_attrs)
            .field("directive_syntax", &self.directive_syntax)
            .field("on_bundle", &self.on_bundle.is_some())
            .finish()
    }
}

impl FileTransform {
    /// Validate options and build the transform.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::RuntimeNotRecord`] when bundling is enabled and
    /// the runtime is a bare path.
    pub fn new(options: TransformOptions) -> Result<Self, FileError> {
        let runtime = match options.runtime {
            Some(Runtime::Path(_)) if options.bundle => return Err(FileError::RuntimeNotRecord),
            Some(Runtime::Path(style)) => RuntimeAssets { style },
            Some(Runtime::Record(assets)) => assets,
            None => RuntimeAssets::default(),
        };

        Ok(Self {
            bundle: options.bundle,
            runtime,
            extra_attrs: options.extra_attrs,
            directive_syntax: options.directive_syntax,
            on_bundle: options.on_bundle,
        })
    }

    /// Like [`new`](Self::new), but bundling copies the runtime stylesheet
    /// into the output root unless the options already carry a callback.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn with_runtime_copy(mut options: TransformOptions) -> Result<Self, FileError> {
        if options.on_bundle.is_none() {
            let on_bundle: Arc<OnBundle> = Arc::new(copy_runtime_on_bundle);
            options.on_bundle = Some(on_bundle);
        }
        Self::new(options)
    }

    /// Resolved runtime assets.
    #[must_use]
    pub fn runtime(&self) -> &RuntimeAssets {
        &self.runtime
    }

    /// Register the extension on a pipeline.
    #[must_use]
    pub fn apply(&self, pipeline: MarkdownPipeline, options: &PluginOptions) -> MarkdownPipeline {
        let extra_attrs = options
            .extra_attrs
            .as_ref()
            .or(self.extra_attrs.as_ref())
            .cloned()
            .unwrap_or_default();
        self.register(pipeline, options.output.clone(), extra_attrs)
    }

    /// Run a parse-only pass over `input` and return its environment.
    ///
    /// Used to collect page assets without rendering. Bundling, when enabled,
    /// writes into `dest_root`.
    ///
    /// # Errors
    ///
    /// Returns the error of the bundling callback.
    pub fn collect(&self, input: &str, dest_root: &Path) -> Result<RenderEnv, RenderError> {
        let extra_attrs = self.extra_attrs.clone().unwrap_or_default();
        let mut pipeline =
            self.register(MarkdownPipeline::new(), dest_root.to_path_buf(), extra_attrs);

        let mut env = RenderEnv::new();
        pipeline.parse(input, &mut env)?;
        Ok(env)
    }

    fn register(
        &self,
        mut pipeline: MarkdownPipeline,
        output: PathBuf,
        extra_attrs: Vec<(String, String)>,
    ) -> MarkdownPipeline {
        if self.directive_syntax.bracket() {
            pipeline = pipeline.with_rule(FileRule::new(extra_attrs.clone()));
        }
        if self.directive_syntax.directive() {
            pipeline = pipeline.with_inline_directive(FileDirective::new(extra_attrs));
        }

        pipeline
            .with_renderer(FileRenderer)
            .with_core_rule(FileAssetsRule {
                bundle: self.bundle,
                runtime: self.runtime.clone(),
                output,
                on_bundle: self.on_bundle.clone(),
            })
    }
}

fn copy_runtime_on_bundle(
    env: &mut RenderEnv,
    output: &Path,
    runtime: &RuntimeAssets,
) -> Result<(), RenderError> {
    copy_runtime(env.bundled_mut(), output, runtime)?;
    Ok(())
}

/// Core rule recording the runtime stylesheet of pages with file links.
pub struct FileAssetsRule {
    bundle: bool,
    runtime: RuntimeAssets,
    output: PathBuf,
    on_bundle: Option<Arc<OnBundle>>,
}

impl CoreRule for FileAssetsRule {
    fn name(&self) -> &'static str {
        ASSETS_RULE_NAME
    }

    fn run(&mut self, env: &mut RenderEnv) -> Result<(), RenderError> {
        if !env.has_flag(ENV_FLAG_NAME) {
            return Ok(());
        }

        env.meta_mut()
            .style
            .get_or_insert_with(Vec::new)
            .push(self.runtime.style.clone());

        if self.bundle
            && let Some(on_bundle) = &self.on_bundle
        {
            env.bundled_mut();
            tracing::debug!(output = %self.output.display(), "Bundling file link assets");
            on_bundle(env, &self.output, &self.runtime)?;
        }

        Ok(())
    }
}
