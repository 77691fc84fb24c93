//! Executable handles: one discovered simulator or interpreter binary.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::discovery::{basename, find_executable, Diagnostic};
use crate::error::{ProgramError, Result};
use crate::parameters::ParameterSet;
use crate::probe::{SystemProbe, VERSION_FLAG};
use crate::version::{coerce_semver, extract_version, Version};

/// The closed set of program kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramKind {
    /// Any executable without kind-specific knowledge.
    Generic,
    /// The NEURON simulator.
    Neuron,
    /// The Python interpreter.
    Python,
    /// The NEST simulator.
    Nest,
}

impl ProgramKind {
    /// Fixed display name, if the kind has one.
    pub fn display_name(&self) -> Option<&'static str> {
        match self {
            ProgramKind::Generic => None,
            ProgramKind::Neuron => Some("NEURON"),
            ProgramKind::Python => Some("Python"),
            ProgramKind::Nest => Some("NEST"),
        }
    }

    /// Bare filename searched for when no path is supplied.
    pub fn default_executable_name(&self) -> Option<&'static str> {
        match self {
            ProgramKind::Generic => None,
            ProgramKind::Neuron => Some("nrniv"),
            ProgramKind::Python => Some("python"),
            ProgramKind::Nest => Some("nest"),
        }
    }

    /// Whether this kind can write parameter files for its scripts.
    pub fn writes_parameters(&self) -> bool {
        matches!(self, ProgramKind::Python)
    }
}

impl fmt::Display for ProgramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProgramKind::Generic => "generic",
            ProgramKind::Neuron => "neuron",
            ProgramKind::Python => "python",
            ProgramKind::Nest => "nest",
        };
        f.write_str(s)
    }
}

/// Serializable description of an executable, for run provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutableRecord {
    pub name: String,
    pub path: PathBuf,
    pub version: Option<String>,
}

/// An installed program, located and version-stamped at construction.
///
/// Immutable once built: `path` named an executable file when it was
/// checked, and `version` is either absent or a non-empty token.
#[derive(Debug, Clone)]
pub struct Executable {
    kind: ProgramKind,
    name: String,
    path: PathBuf,
    version: Option<String>,
    diagnostics: Vec<Diagnostic>,
}

impl Executable {
    /// Build a handle for `kind`.
    ///
    /// Without a `path`, the search path is scanned for the kind's default
    /// executable name; generic executables therefore require a path.
    /// Without a `version`, the program is queried with `--version`.
    pub fn new(
        kind: ProgramKind,
        path: Option<PathBuf>,
        version: Option<String>,
        probe: &dyn SystemProbe,
    ) -> Result<Self> {
        if path.is_none() && kind.default_executable_name().is_none() {
            return Err(ProgramError::InvalidArguments {
                detail: "a generic executable requires an explicit path".to_string(),
            });
        }
        let executable = kind.default_executable_name().unwrap_or_default();
        let program = kind.display_name().unwrap_or(executable);
        Self::locate(kind, program, executable, path, version, probe)
    }

    /// Build a handle for an arbitrary executable at `path`.
    pub fn generic(path: PathBuf, probe: &dyn SystemProbe) -> Result<Self> {
        Self::new(ProgramKind::Generic, Some(path), None, probe)
    }

    /// Shared construction path. `program` labels errors and `executable` is
    /// the filename searched for when `path` is absent.
    pub(crate) fn locate(
        kind: ProgramKind,
        program: &str,
        executable: &str,
        path: Option<PathBuf>,
        version: Option<String>,
        probe: &dyn SystemProbe,
    ) -> Result<Self> {
        let mut diagnostics = Vec::new();

        let path = match path {
            Some(path) => {
                let path = std::path::absolute(&path)?;
                if !probe.is_executable(&path) {
                    return Err(ProgramError::NotExecutable { path });
                }
                path
            }
            None => {
                let discovery = find_executable(probe, program, executable)?;
                if discovery.is_ambiguous() {
                    diagnostics.push(Diagnostic::AmbiguousDiscovery {
                        selected: discovery.selected.clone(),
                        candidates: discovery.candidates,
                    });
                }
                discovery.selected
            }
        };

        let version = match version.filter(|v| !v.trim().is_empty()) {
            Some(v) => Some(v),
            None => {
                let (found, diagnostic) = query_version(probe, &path);
                diagnostics.extend(diagnostic);
                found
            }
        };

        let name = match kind.display_name() {
            Some(name) => name.to_string(),
            None => basename(&path).unwrap_or_else(|| program.to_string()),
        };

        Ok(Executable {
            kind,
            name,
            path,
            version,
            diagnostics,
        })
    }

    /// The program kind.
    pub fn kind(&self) -> ProgramKind {
        self.kind
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path to the binary.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The version token, if one was supplied or could be parsed.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// The version token interpreted as a semantic version.
    pub fn semver(&self) -> Option<Version> {
        self.version.as_deref().and_then(coerce_semver)
    }

    /// Non-fatal conditions recorded during construction.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Serializable summary for provenance records.
    pub fn record(&self) -> ExecutableRecord {
        ExecutableRecord {
            name: self.name.clone(),
            path: self.path.clone(),
            version: self.version.clone(),
        }
    }

    /// Write a parameter file in the form this program's scripts read.
    pub fn write_parameters(&self, parameters: &dyn ParameterSet, file: &Path) -> Result<()> {
        if !self.kind.writes_parameters() {
            return Err(ProgramError::Unsupported {
                program: self.name.clone(),
                operation: "writing parameter files".to_string(),
            });
        }
        parameters.save(file)
    }
}

impl fmt::Display for Executable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (version: {}) at {}",
            self.name,
            self.version.as_deref().unwrap_or("unknown"),
            self.path.display()
        )
    }
}

/// Run the version query once and parse it. Never fails.
fn query_version(probe: &dyn SystemProbe, path: &Path) -> (Option<String>, Option<Diagnostic>) {
    let unavailable = |reason: &str| Diagnostic::VersionUnavailable {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };
    let Some(output) = probe.version_output(path) else {
        tracing::info!(path = %path.display(), "could not run {VERSION_FLAG}; version unknown");
        return (None, Some(unavailable("process could not be started")));
    };
    match extract_version(&output) {
        Some(version) => {
            tracing::debug!(path = %path.display(), version = %version, "parsed version");
            (Some(version), None)
        }
        None => {
            tracing::info!(path = %path.display(), "no version in {VERSION_FLAG} output");
            (None, Some(unavailable("no version token in output")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::tests::FakeProbe;
    use crate::parameters::Parameters;

    #[test]
    fn explicit_path_and_version_never_probe() {
        let probe = FakeProbe::new(&["/usr/bin"]).install("/opt/nrn/bin/nrniv", None);
        let exe = Executable::new(
            ProgramKind::Neuron,
            Some(PathBuf::from("/opt/nrn/bin/nrniv")),
            Some("8.2.2".to_string()),
            &probe,
        )
        .unwrap();
        assert_eq!(probe.search_calls.get(), 0);
        assert_eq!(probe.version_calls.get(), 0);
        assert_eq!(exe.version(), Some("8.2.2"));
        assert!(exe.diagnostics().is_empty());
    }

    #[test]
    fn discovers_path_and_version() {
        let probe = FakeProbe::new(&["/usr/local/bin", "/usr/bin"])
            .install("/usr/bin/python", Some("Python 3.11.4\n"));
        let exe = Executable::new(ProgramKind::Python, None, None, &probe).unwrap();
        assert_eq!(exe.name(), "Python");
        assert_eq!(exe.path(), Path::new("/usr/bin/python"));
        assert_eq!(exe.version(), Some("3.11.4"));
        assert_eq!(exe.semver(), Some(Version::new(3, 11, 4)));
        assert_eq!(probe.version_calls.get(), 1);
    }

    #[test]
    fn ambiguous_discovery_is_reported_not_fatal() {
        let probe = FakeProbe::new(&["/opt/nest-3/bin", "/opt/nest-2/bin"])
            .install("/opt/nest-3/bin/nest", Some("NEST version 3.6\n"))
            .install("/opt/nest-2/bin/nest", Some("NEST version 2.20.0\n"));
        let exe = Executable::new(ProgramKind::Nest, None, None, &probe).unwrap();
        assert_eq!(exe.path(), Path::new("/opt/nest-3/bin/nest"));
        assert_eq!(exe.version(), Some("3.6"));
        assert!(matches!(
            exe.diagnostics(),
            [Diagnostic::AmbiguousDiscovery { candidates, .. }] if candidates.len() == 2
        ));
    }

    #[test]
    fn missing_executable_is_fatal() {
        let probe = FakeProbe::new(&["/usr/bin"]);
        let err = Executable::new(ProgramKind::Neuron, None, None, &probe).unwrap_err();
        assert!(matches!(
            err,
            ProgramError::ExecutableNotFound { ref program, ref executable }
                if program == "NEURON" && executable == "nrniv"
        ));
    }

    #[test]
    fn unparseable_version_is_absent() {
        let probe = FakeProbe::new(&["/usr/bin"]).install("/usr/bin/nrniv", Some("usage: nrniv"));
        let exe = Executable::new(ProgramKind::Neuron, None, None, &probe).unwrap();
        assert_eq!(exe.version(), None);
        assert!(matches!(
            exe.diagnostics(),
            [Diagnostic::VersionUnavailable { .. }]
        ));
        assert_eq!(
            exe.to_string(),
            "NEURON (version: unknown) at /usr/bin/nrniv"
        );
    }

    #[test]
    fn unstartable_version_query_is_absent() {
        let probe = FakeProbe::new(&["/usr/bin"]).install("/usr/bin/nest", None);
        let exe = Executable::new(ProgramKind::Nest, None, None, &probe).unwrap();
        assert_eq!(exe.version(), None);
    }

    #[test]
    fn empty_explicit_version_triggers_query() {
        let probe = FakeProbe::new(&[]).install("/usr/bin/python", Some("Python 3.12.1\n"));
        let exe = Executable::new(
            ProgramKind::Python,
            Some(PathBuf::from("/usr/bin/python")),
            Some(String::new()),
            &probe,
        )
        .unwrap();
        assert_eq!(exe.version(), Some("3.12.1"));
    }

    #[test]
    fn generic_name_defaults_to_basename() {
        let probe = FakeProbe::new(&[]).install("/opt/tools/brian2", Some("brian2 2.5.1\n"));
        let exe = Executable::generic(PathBuf::from("/opt/tools/brian2"), &probe).unwrap();
        assert_eq!(exe.kind(), ProgramKind::Generic);
        assert_eq!(exe.name(), "brian2");
        assert_eq!(exe.version(), Some("2.5.1"));
    }

    #[test]
    fn generic_without_path_is_invalid() {
        let probe = FakeProbe::new(&["/usr/bin"]);
        assert!(matches!(
            Executable::new(ProgramKind::Generic, None, None, &probe),
            Err(ProgramError::InvalidArguments { .. })
        ));
        assert_eq!(probe.search_calls.get(), 0);
    }

    #[test]
    fn explicit_path_must_be_executable() {
        let probe = FakeProbe::new(&[]);
        assert!(matches!(
            Executable::generic(PathBuf::from("/nowhere/tool"), &probe),
            Err(ProgramError::NotExecutable { .. })
        ));
    }

    #[test]
    fn renders_summary() {
        let probe = FakeProbe::new(&[]).install("/usr/bin/python", None);
        let exe = Executable::new(
            ProgramKind::Python,
            Some(PathBuf::from("/usr/bin/python")),
            Some("3.10.12".to_string()),
            &probe,
        )
        .unwrap();
        assert_eq!(exe.to_string(), "Python (version: 3.10.12) at /usr/bin/python");
    }

    #[test]
    fn record_captures_identity() {
        let probe = FakeProbe::new(&[]).install("/usr/bin/nrniv", None);
        let exe = Executable::new(
            ProgramKind::Neuron,
            Some(PathBuf::from("/usr/bin/nrniv")),
            Some("7.5".to_string()),
            &probe,
        )
        .unwrap();
        let json = serde_json::to_value(exe.record()).unwrap();
        assert_eq!(json["name"], "NEURON");
        assert_eq!(json["version"], "7.5");
        assert_eq!(json["path"], "/usr/bin/nrniv");
    }

    #[test]
    fn only_python_writes_parameters() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("params.json");
        let probe = FakeProbe::new(&[])
            .install("/usr/bin/python", None)
            .install("/usr/bin/nrniv", None);
        let mut params = Parameters::new();
        params.set("tau_m", 20.0);

        let python = Executable::new(
            ProgramKind::Python,
            Some(PathBuf::from("/usr/bin/python")),
            Some("3.11.4".to_string()),
            &probe,
        )
        .unwrap();
        python.write_parameters(&params, &file).unwrap();
        assert!(file.is_file());

        let neuron = Executable::new(
            ProgramKind::Neuron,
            Some(PathBuf::from("/usr/bin/nrniv")),
            Some("7.5".to_string()),
            &probe,
        )
        .unwrap();
        assert!(matches!(
            neuron.write_parameters(&params, &file),
            Err(ProgramError::Unsupported { .. })
        ));
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ProgramKind::Neuron).unwrap(), "\"neuron\"");
        assert_eq!(ProgramKind::Nest.to_string(), "nest");
    }
}
