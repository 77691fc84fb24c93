//! `simprov.toml` configuration: extra programs, pinned paths, search path.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ProgramError, Result};
use crate::executable::ProgramKind;
use crate::probe::HostProbe;
use crate::registry::Registry;

/// Name of the configuration file searched for by [`Config::find_and_load`].
pub const CONFIG_FILE: &str = "simprov.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directories searched instead of the `PATH` environment variable.
    #[serde(default)]
    pub search_path: Option<Vec<PathBuf>>,
    /// Additional program registrations, applied in order.
    #[serde(default)]
    pub programs: Vec<ProgramEntry>,
    /// Executable basename → pinned path.
    #[serde(default)]
    pub executables: BTreeMap<String, PathBuf>,
}

/// A `[[programs]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramEntry {
    pub kind: ProgramKind,
    pub name: String,
    pub executable: String,
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl Config {
    /// Parse a configuration from TOML text.
    pub fn parse(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        config.validate(path)?;
        Ok(config)
    }

    /// Search upward from `start_dir` for `simprov.toml`, returning the parsed
    /// configuration and the file it came from.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                let config = Self::load(&candidate)?;
                return Ok(Some((config, candidate)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        for entry in &self.programs {
            if entry.name.is_empty() || entry.executable.is_empty() {
                return Err(ProgramError::InvalidConfig {
                    path: path.to_path_buf(),
                    detail: "program entries need a name and an executable".to_string(),
                });
            }
        }
        for (executable, pinned) in &self.executables {
            if !pinned.is_absolute() {
                return Err(ProgramError::InvalidConfig {
                    path: path.to_path_buf(),
                    detail: format!(
                        "pinned path for '{executable}' must be absolute: {}",
                        pinned.display()
                    ),
                });
            }
        }
        Ok(())
    }

    /// Register every configured program and pin every configured path.
    pub fn apply(&self, registry: &mut Registry) {
        for entry in &self.programs {
            registry.register(
                entry.kind,
                &entry.name,
                &entry.executable,
                entry.extensions.as_slice(),
            );
        }
        for (executable, path) in &self.executables {
            registry.pin(executable, path.clone());
        }
    }

    /// Host probe honoring the configured search path.
    pub fn probe(&self) -> HostProbe {
        match &self.search_path {
            Some(dirs) => HostProbe::with_search_path(dirs.clone()),
            None => HostProbe::new(),
        }
    }
}
