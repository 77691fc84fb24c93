//! Identification and version-stamping of simulator executables.
//!
//! Answers "which program ran this?" for reproducible simulation records:
//! - **Executables**: a located binary with its parsed version
//! - **Registry**: maps program names, executable basenames, and script
//!   extensions to program kinds
//! - **Version parsing**: permissive token extraction from `--version` banners
//!
//! Host access (search path, file checks, child processes) goes through the
//! [`SystemProbe`] trait so that discovery is deterministic under test.

pub mod config;
pub mod discovery;
pub mod error;
pub mod executable;
pub mod parameters;
pub mod probe;
pub mod registry;
pub mod version;

// Re-exports for convenience.
pub use config::{Config, ProgramEntry, CONFIG_FILE};
pub use discovery::{find_executable, Diagnostic, Discovery};
pub use error::{ProgramError, Result};
pub use executable::{Executable, ExecutableRecord, ProgramKind};
pub use parameters::{ParameterFormat, ParameterSet, Parameters};
pub use probe::{HostProbe, SystemProbe, VERSION_FLAG};
pub use registry::{Registration, Registry};
pub use version::{coerce_semver, extract_version, Version};
