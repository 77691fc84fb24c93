//! Runtime settings: configuration file, registry, and host probe.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use simprov_programs::{Config, HostProbe, Registry};

/// Everything a command needs to identify programs.
pub struct Settings {
    /// Where the configuration came from, if a file was used.
    pub source: Option<PathBuf>,
    /// Built-in programs plus configured registrations and pins.
    pub registry: Registry,
    /// Host probe honoring the configured search path.
    pub probe: HostProbe,
}

impl Settings {
    /// Load `explicit` if given, otherwise the nearest `simprov.toml` above
    /// `cwd`, otherwise defaults.
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        let (config, source) = match explicit {
            Some(path) => {
                let config = Config::load(path)
                    .with_context(|| format!("loading {}", path.display()))?;
                (config, Some(path.to_path_buf()))
            }
            None => match Config::find_and_load(cwd)
                .with_context(|| format!("searching for config above {}", cwd.display()))?
            {
                Some((config, path)) => (config, Some(path)),
                None => (Config::default(), None),
            },
        };
        if let Some(path) = &source {
            tracing::debug!(config = %path.display(), "loaded configuration");
        }
        Ok(Self::from_config(&config, source))
    }

    /// Build settings from an already-parsed configuration.
    pub fn from_config(config: &Config, source: Option<PathBuf>) -> Self {
        let mut registry = Registry::with_builtins();
        config.apply(&mut registry);
        Settings {
            source,
            registry,
            probe: config.probe(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(None, dir.path()).unwrap();
        assert!(settings.source.is_none());
        assert!(settings.registry.lookup_extension(".hoc").is_some());
    }

    #[test]
    fn explicit_config_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("custom.toml");
        std::fs::write(
            &file,
            "[[programs]]\nkind = \"generic\"\nname = \"Brian\"\nexecutable = \"brian\"\nextensions = [\".br\"]\n",
        )
        .unwrap();
        let settings = Settings::load(Some(&file), dir.path()).unwrap();
        assert_eq!(settings.source.as_deref(), Some(file.as_path()));
        assert_eq!(settings.registry.lookup_extension(".br").unwrap().name, "Brian");
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::load(Some(&dir.path().join("absent.toml")), dir.path()).is_err());
    }
}
