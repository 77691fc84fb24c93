//! Search-path discovery of executables.
//!
//! Every directory on the search path is checked, in order. Zero matches is
//! an error, one match is selected silently, and several matches select the
//! first while reporting the ambiguity so the operator can pin a path.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{ProgramError, Result};
use crate::probe::SystemProbe;

/// Outcome of a search-path scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    /// The selected executable (first candidate in search-path order).
    pub selected: PathBuf,
    /// Every matching executable, in search-path order.
    pub candidates: Vec<PathBuf>,
}

impl Discovery {
    /// Whether more than one directory held a matching executable.
    pub fn is_ambiguous(&self) -> bool {
        self.candidates.len() > 1
    }
}

/// A non-fatal condition noticed while constructing an executable handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Several candidates were found; the first was used.
    AmbiguousDiscovery {
        selected: PathBuf,
        candidates: Vec<PathBuf>,
    },
    /// The version could not be determined.
    VersionUnavailable { path: PathBuf, reason: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::AmbiguousDiscovery { selected, candidates } => write!(
                f,
                "multiple versions found ({} candidates), using {}. \
                 If you wish to use a different version, please specify it explicitly",
                candidates.len(),
                selected.display()
            ),
            Diagnostic::VersionUnavailable { path, reason } => {
                write!(f, "version of {} unavailable: {reason}", path.display())
            }
        }
    }
}

/// Scan the probe's search path for `executable`.
///
/// `program` is the human-readable name used in the not-found error.
pub fn find_executable(
    probe: &dyn SystemProbe,
    program: &str,
    executable: &str,
) -> Result<Discovery> {
    let candidates: Vec<PathBuf> = probe
        .search_path()
        .iter()
        .map(|dir| dir.join(executable))
        .filter(|candidate| {
            let hit = probe.is_executable(candidate);
            tracing::debug!(candidate = %candidate.display(), hit, "search-path candidate");
            hit
        })
        .collect();

    let Some(selected) = candidates.first().cloned() else {
        return Err(ProgramError::ExecutableNotFound {
            program: program.to_string(),
            executable: executable.to_string(),
        });
    };

    let discovery = Discovery {
        selected,
        candidates,
    };
    if discovery.is_ambiguous() {
        tracing::warn!(
            program,
            selected = %discovery.selected.display(),
            candidates = discovery.candidates.len(),
            "multiple executables found on the search path; pin one explicitly to override"
        );
    } else {
        tracing::info!(program, path = %discovery.selected.display(), "using executable");
    }
    Ok(discovery)
}

/// Basename of a path as a string, if it has one.
pub(crate) fn basename(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}
