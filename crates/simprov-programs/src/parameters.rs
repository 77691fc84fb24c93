//! Parameter files handed to simulation scripts.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ProgramError, Result};

/// Anything that can persist itself as a parameter file.
pub trait ParameterSet {
    /// Write the parameters to `path`.
    fn save(&self, path: &Path) -> Result<()>;
}

/// On-disk format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterFormat {
    Toml,
    Json,
}

impl ParameterFormat {
    /// Infer the format from `path`'s extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(ParameterFormat::Toml),
            Some("json") => Ok(ParameterFormat::Json),
            other => Err(ProgramError::InvalidArguments {
                detail: format!(
                    "cannot infer parameter format from extension {:?} of {}",
                    other.unwrap_or(""),
                    path.display()
                ),
            }),
        }
    }
}

/// A flat, ordered map of named parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters {
    values: BTreeMap<String, toml::Value>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<toml::Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&toml::Value> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read a parameter file written by [`ParameterSet::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(match ParameterFormat::from_path(path)? {
            ParameterFormat::Toml => toml::from_str(&text)?,
            ParameterFormat::Json => serde_json::from_str(&text)?,
        })
    }
}

impl ParameterSet for Parameters {
    fn save(&self, path: &Path) -> Result<()> {
        let text = match ParameterFormat::from_path(path)? {
            ParameterFormat::Toml => toml::to_string(self)?,
            ParameterFormat::Json => serde_json::to_string_pretty(self)?,
        };
        std::fs::write(path, text)?;
        Ok(())
    }
}
