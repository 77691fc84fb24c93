//! Program identification error types.

use std::path::PathBuf;

/// Errors that can occur while discovering or resolving programs.
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    /// The executable is absent from every search-path directory.
    #[error(
        "{program} could not be found. Please supply the path to the {executable} executable."
    )]
    ExecutableNotFound { program: String, executable: String },

    /// An explicitly supplied path does not name an executable file.
    #[error("not an executable file: {}", path.display())]
    NotExecutable { path: PathBuf },

    /// No program is registered for a script file extension.
    #[error("extension not recognized: '{extension}'")]
    ExtensionNotFound { extension: String },

    /// No program is registered under a display name.
    #[error("no program registered under the name '{name}'")]
    NameNotFound { name: String },

    /// Caller contract violation (e.g. both or neither resolution inputs).
    #[error("invalid arguments: {detail}")]
    InvalidArguments { detail: String },

    /// Operation not offered by this kind of program.
    #[error("{program} does not support {operation}")]
    Unsupported { program: String, operation: String },

    /// Configuration file could not be used.
    #[error("invalid configuration at {}: {detail}", path.display())]
    InvalidConfig { path: PathBuf, detail: String },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProgramError {
    /// Whether this error means "nothing matched": a missing executable or
    /// an unregistered extension or name.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ProgramError::ExecutableNotFound { .. }
                | ProgramError::ExtensionNotFound { .. }
                | ProgramError::NameNotFound { .. }
        )
    }
}

/// Result type alias for program operations.
pub type Result<T> = std::result::Result<T, ProgramError>;
