use thiserror::Error;

/// Unified error type for verbump operations
#[derive(Error, Debug)]
pub enum BumpError {
    #[error("Cannot read manifest {path}: {reason}")]
    ManifestUnreadable { path: String, reason: String },

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("External command failed: {0}")]
    ExternalCommand(String),

    #[error("Cannot query remote tags: {0}")]
    RemoteQuery(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in verbump
pub type Result<T> = std::result::Result<T, BumpError>;

impl BumpError {
    /// Create a manifest error for the given path
    pub fn manifest(path: impl Into<String>, reason: impl Into<String>) -> Self {
        BumpError::ManifestUnreadable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        BumpError::InvalidVersion(msg.into())
    }

    /// Create an external command error with context
    pub fn command(msg: impl Into<String>) -> Self {
        BumpError::ExternalCommand(msg.into())
    }

    /// Create a remote query error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        BumpError::RemoteQuery(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        BumpError::Config(msg.into())
    }

    /// Create a prompt error with context
    pub fn prompt(msg: impl Into<String>) -> Self {
        BumpError::Prompt(msg.into())
    }

    /// Errors that end the whole run with a non-zero exit code.
    ///
    /// Everything else only stops the current sub-flow.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BumpError::ManifestUnreadable { .. } | BumpError::InvalidVersion(_) | BumpError::Config(_)
        )
    }
}
