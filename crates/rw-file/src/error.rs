//! File link extension errors.

/// Error raised while constructing a [`FileTransform`](crate::FileTransform).
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    /// A bare stylesheet path gives no target name to copy the runtime to.
    #[error("Option `runtime` should be record when `bundle` is enabled")]
    RuntimeNotRecord,
}
