//! Script and repository error types.

/// Errors that can occur while managing versioned scripts.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// The operation needs a repository but the script has none.
    #[error("script is not under version control")]
    UnboundRepository,

    /// A repository operation failed.
    #[error("repository {url}: {detail}")]
    Repository { url: String, detail: String },

    /// Caller contract violation.
    #[error("invalid arguments: {detail}")]
    InvalidArguments { detail: String },
}

/// Result type alias for script operations.
pub type Result<T> = std::result::Result<T, ScriptError>;
