//! Host interaction seam: search path, executable checks, version queries.
//!
//! Every side effect an [`Executable`](crate::Executable) needs goes through
//! [`SystemProbe`], so discovery can be exercised against fake hosts.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Flag passed to a program to make it print its version banner.
pub const VERSION_FLAG: &str = "--version";

/// Abstract view of the host system.
pub trait SystemProbe {
    /// Ordered list of directories to search for executables.
    fn search_path(&self) -> Vec<PathBuf>;

    /// Whether `path` names an existing executable file.
    fn is_executable(&self, path: &Path) -> bool;

    /// Run `<path> --version` and return combined stdout and stderr.
    ///
    /// Returns `None` if the process could not be started. The exit status
    /// is not inspected.
    fn version_output(&self, path: &Path) -> Option<String>;
}

/// The real host: `PATH`, filesystem metadata, and child processes.
#[derive(Debug, Clone, Default)]
pub struct HostProbe {
    search_path: Option<Vec<PathBuf>>,
}

impl HostProbe {
    /// Probe that reads the search path from the `PATH` environment variable.
    pub fn new() -> Self {
        HostProbe { search_path: None }
    }

    /// Probe that searches the given directories instead of `PATH`.
    pub fn with_search_path(dirs: Vec<PathBuf>) -> Self {
        HostProbe {
            search_path: Some(dirs),
        }
    }
}

impl SystemProbe for HostProbe {
    fn search_path(&self) -> Vec<PathBuf> {
        if let Some(dirs) = &self.search_path {
            return dirs.clone();
        }
        match std::env::var_os("PATH") {
            Some(raw) => std::env::split_paths(&raw).collect(),
            None => Vec::new(),
        }
    }

    fn is_executable(&self, path: &Path) -> bool {
        let Ok(metadata) = std::fs::metadata(path) else {
            return false;
        };
        metadata.is_file() && has_exec_bits(&metadata)
    }

    fn version_output(&self, path: &Path) -> Option<String> {
        // `output()` waits for the child and closes both pipes on every path.
        match Command::new(path).arg(VERSION_FLAG).output() {
            Ok(output) => {
                let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
                text.push_str(&String::from_utf8_lossy(&output.stderr));
                Some(text)
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "version query failed to start");
                None
            }
        }
    }
}

#[cfg(unix)]
fn has_exec_bits(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn has_exec_bits(_metadata: &std::fs::Metadata) -> bool {
    true
}
