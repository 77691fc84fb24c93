//! Program registry: which program runs this executable or this script.
//!
//! Three lookup tables map a display name, an executable basename, and a
//! script extension to a [`Registration`]. Entries are only ever added; a
//! later registration for the same key replaces the earlier one.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::discovery::basename;
use crate::error::{ProgramError, Result};
use crate::executable::{Executable, ProgramKind};
use crate::probe::SystemProbe;

/// One registered program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// The kind constructed when this entry matches.
    pub kind: ProgramKind,
    /// Display name the entry was registered under.
    pub name: String,
    /// Executable basename matched against paths and searched for on the
    /// search path.
    pub executable: String,
    /// Script extensions, each with a leading dot.
    pub extensions: Vec<String>,
}

/// Lookup table from names, executables, and extensions to program kinds.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    by_name: HashMap<String, Registration>,
    by_executable: HashMap<String, Registration>,
    by_extension: HashMap<String, Registration>,
    pinned: HashMap<String, PathBuf>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in programs.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(ProgramKind::Neuron, "NEURON", "nrniv", &[".hoc", ".oc"]);
        registry.register(ProgramKind::Python, "Python", "python", &[".py"]);
        registry.register(ProgramKind::Nest, "NEST", "nest", &[".sli"]);
        registry
    }

    /// Register a program under a display name, an executable basename, and
    /// a set of script extensions. Colliding keys are overwritten.
    pub fn register<S: AsRef<str>>(
        &mut self,
        kind: ProgramKind,
        name: &str,
        executable: &str,
        extensions: &[S],
    ) {
        let registration = Registration {
            kind,
            name: name.to_string(),
            executable: executable.to_string(),
            extensions: extensions
                .iter()
                .map(|e| normalize_extension(e.as_ref()))
                .collect(),
        };
        for ext in &registration.extensions {
            if let Some(previous) = self.by_extension.insert(ext.clone(), registration.clone()) {
                if previous.name != registration.name {
                    tracing::debug!(
                        extension = %ext,
                        from = %previous.name,
                        to = %registration.name,
                        "extension re-registered"
                    );
                }
            }
        }
        self.by_executable
            .insert(registration.executable.clone(), registration.clone());
        self.by_name.insert(registration.name.clone(), registration);
    }

    /// Use `path` instead of search-path discovery for `executable`.
    pub fn pin(&mut self, executable: &str, path: PathBuf) {
        self.pinned.insert(executable.to_string(), path);
    }

    /// The pinned path for an executable basename, if any.
    pub fn pinned(&self, executable: &str) -> Option<&Path> {
        self.pinned.get(executable).map(PathBuf::as_path)
    }

    /// Registration for a display name.
    pub fn lookup_name(&self, name: &str) -> Option<&Registration> {
        self.by_name.get(name)
    }

    /// Registration for an executable basename.
    pub fn lookup_executable(&self, executable: &str) -> Option<&Registration> {
        self.by_executable.get(executable)
    }

    /// Registration for a script extension (with or without leading dot).
    pub fn lookup_extension(&self, extension: &str) -> Option<&Registration> {
        self.by_extension.get(&normalize_extension(extension))
    }

    /// All registrations by display name, sorted by name.
    pub fn registrations(&self) -> Vec<&Registration> {
        let sorted: BTreeMap<&str, &Registration> =
            self.by_name.iter().map(|(k, v)| (k.as_str(), v)).collect();
        sorted.into_values().collect()
    }

    /// Extensions currently mapped to the program registered as `name`.
    pub fn extensions_of(&self, name: &str) -> Vec<&str> {
        let mut exts: Vec<&str> = self
            .by_extension
            .iter()
            .filter(|(_, r)| r.name == name)
            .map(|(ext, _)| ext.as_str())
            .collect();
        exts.sort_unstable();
        exts
    }

    /// Determine the program for an executable path or a script file.
    ///
    /// Exactly one of `path` and `script_file` must be given.
    pub fn resolve(
        &self,
        path: Option<&Path>,
        script_file: Option<&Path>,
        probe: &dyn SystemProbe,
    ) -> Result<Executable> {
        match (path, script_file) {
            (Some(path), None) => self.resolve_path(path, probe),
            (None, Some(script)) => self.resolve_script(script, probe),
            (None, None) => Err(ProgramError::InvalidArguments {
                detail: "either path or script_file must be specified".to_string(),
            }),
            (Some(_), Some(_)) => Err(ProgramError::InvalidArguments {
                detail: "only one of path and script_file may be specified".to_string(),
            }),
        }
    }

    /// Identify the program at `path` by its basename.
    ///
    /// Unregistered basenames yield a generic handle.
    pub fn resolve_path(&self, path: &Path, probe: &dyn SystemProbe) -> Result<Executable> {
        let registration = basename(path).and_then(|b| self.by_executable.get(&b));
        match registration {
            Some(reg) => self.build(reg, Some(path.to_path_buf()), probe),
            None => Executable::generic(path.to_path_buf(), probe),
        }
    }

    /// Infer the program that runs `script_file` from its extension.
    pub fn resolve_script(&self, script_file: &Path, probe: &dyn SystemProbe) -> Result<Executable> {
        let extension = script_extension(script_file);
        let Some(reg) = self.by_extension.get(&extension) else {
            return Err(ProgramError::ExtensionNotFound { extension });
        };
        let path = self.pinned(&reg.executable).map(Path::to_path_buf);
        self.build(reg, path, probe)
    }

    /// Discover the program registered under a display name.
    pub fn resolve_name(&self, name: &str, probe: &dyn SystemProbe) -> Result<Executable> {
        let Some(reg) = self.by_name.get(name) else {
            return Err(ProgramError::NameNotFound {
                name: name.to_string(),
            });
        };
        let path = self.pinned(&reg.executable).map(Path::to_path_buf);
        self.build(reg, path, probe)
    }

    fn build(
        &self,
        reg: &Registration,
        path: Option<PathBuf>,
        probe: &dyn SystemProbe,
    ) -> Result<Executable> {
        let program = reg.kind.display_name().unwrap_or(reg.name.as_str());
        Executable::locate(reg.kind, program, &reg.executable, path, None, probe)
    }
}

/// Extension of `file` including the leading dot, or empty if it has none.
fn script_extension(file: &Path) -> String {
    match file.extension() {
        Some(ext) => format!(".{}", ext.to_string_lossy()),
        None => String::new(),
    }
}

fn normalize_extension(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}
