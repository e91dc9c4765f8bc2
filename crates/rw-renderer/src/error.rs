//! Render pipeline errors.

/// Error raised while running a document pass.
///
/// Recognition never fails: malformed markup simply stays as text. Errors only
/// come from collaborators invoked by core rules (asset copy callbacks and the
/// like), and they are passed through without rewording.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// I/O error raised by a core rule collaborator.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Any other collaborator error.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}
