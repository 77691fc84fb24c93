//! Script handles: simulation source code bound to a repository.
//!
//! A script moves through three states:
//!
//! ```text
//! Unbound ──(change_repository)──▶ Tracking ──(update_code)──▶ Pinned
//!                                     ▲                          │
//!                                     └───(change_repository)────┘
//! ```
//!
//! `Tracking` has a repository but no revision yet. The first
//! `update_code` freezes whatever the working copy is at as the pinned
//! revision; every later call moves the working copy back to exactly that
//! revision.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScriptError};
use crate::repository::{Repository, RepositoryFactory, Revision};

/// Which of the three lifecycle states a script is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptState {
    /// No repository.
    Unbound,
    /// Repository bound, revision not yet captured.
    Tracking,
    /// Repository bound, revision pinned.
    Pinned,
}

#[derive(Debug)]
enum Binding {
    Unbound,
    Tracking(Box<dyn Repository>),
    Pinned {
        repository: Box<dyn Repository>,
        revision: Revision,
    },
}

/// Serializable description of a script, for run provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRecord {
    pub repository: Option<String>,
    pub version: Option<Revision>,
    pub main_file: Option<PathBuf>,
}

/// Versioned simulation code.
#[derive(Debug)]
pub struct Script {
    main_file: Option<PathBuf>,
    binding: Binding,
}

impl Script {
    /// Declare a script from a repository URL and an optional main file.
    ///
    /// A missing or empty URL yields an unbound script.
    pub fn new(
        factory: &dyn RepositoryFactory,
        repository_url: Option<&str>,
        main_file: Option<PathBuf>,
    ) -> Result<Self> {
        let binding = match open(factory, repository_url)? {
            Some(repository) => Binding::Tracking(repository),
            None => Binding::Unbound,
        };
        Ok(Script { main_file, binding })
    }

    /// A script with no repository.
    pub fn unbound(main_file: Option<PathBuf>) -> Self {
        Script {
            main_file,
            binding: Binding::Unbound,
        }
    }

    /// Declare a script already pinned to `revision`, e.g. to reproduce a
    /// recorded run.
    pub fn pinned(
        factory: &dyn RepositoryFactory,
        repository_url: &str,
        main_file: Option<PathBuf>,
        revision: Revision,
    ) -> Result<Self> {
        let Some(repository) = open(factory, Some(repository_url))? else {
            return Err(ScriptError::InvalidArguments {
                detail: format!("no repository at '{repository_url}' to pin {revision} in"),
            });
        };
        Ok(Script {
            main_file,
            binding: Binding::Pinned {
                repository,
                revision,
            },
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ScriptState {
        match self.binding {
            Binding::Unbound => ScriptState::Unbound,
            Binding::Tracking(_) => ScriptState::Tracking,
            Binding::Pinned { .. } => ScriptState::Pinned,
        }
    }

    /// Entry-point file, if one was given.
    pub fn main_file(&self) -> Option<&Path> {
        self.main_file.as_deref()
    }

    /// The bound repository, if any.
    pub fn repository(&self) -> Option<&dyn Repository> {
        match &self.binding {
            Binding::Unbound => None,
            Binding::Tracking(repository) | Binding::Pinned { repository, .. } => {
                Some(repository.as_ref())
            }
        }
    }

    /// The pinned revision; `None` means "track latest" (or no repository).
    pub fn version(&self) -> Option<&Revision> {
        match &self.binding {
            Binding::Pinned { revision, .. } => Some(revision),
            _ => None,
        }
    }

    /// Materialize a working copy if a repository is bound and none exists.
    ///
    /// Never overwrites an existing working copy.
    pub fn checkout(&mut self) -> Result<()> {
        let repository = match &mut self.binding {
            Binding::Unbound => return Ok(()),
            Binding::Tracking(repository) | Binding::Pinned { repository, .. } => repository,
        };
        if repository.has_working_copy() {
            return Ok(());
        }
        tracing::info!(url = repository.url(), "checking out working copy");
        repository.checkout()
    }

    /// Rebind to the repository at `repository_url`.
    ///
    /// A pinned revision belongs to the old repository's revision space and
    /// is dropped; the script tracks the new repository until the next
    /// `update_code`. An empty URL unbinds the script. `main_file` is kept.
    pub fn change_repository(
        &mut self,
        factory: &dyn RepositoryFactory,
        repository_url: &str,
    ) -> Result<()> {
        let repository = open(factory, Some(repository_url))?;
        if let Binding::Pinned { repository: old, revision } = &self.binding {
            tracing::warn!(
                from = old.url(),
                to = repository_url,
                revision = %revision,
                "repository changed; dropping pinned revision"
            );
        }
        self.binding = match repository {
            Some(repository) => Binding::Tracking(repository),
            None => Binding::Unbound,
        };
        Ok(())
    }

    /// Whether the working copy differs from the tracked state.
    pub fn has_changed(&self) -> Result<bool> {
        match self.repository() {
            Some(repository) => repository.has_changed(),
            None => Err(ScriptError::UnboundRepository),
        }
    }

    /// Put the pinned revision on disk, pinning the current one first if
    /// nothing is pinned yet. Does nothing for an unbound script.
    pub fn update_code(&mut self) -> Result<()> {
        if let Binding::Tracking(repository) = &self.binding {
            let revision = repository.current_revision()?;
            tracing::info!(url = repository.url(), revision = %revision, "pinning current revision");
            self.pin(revision);
        }
        if let Binding::Pinned {
            repository,
            revision,
        } = &mut self.binding
        {
            repository.use_revision(revision)?;
        }
        Ok(())
    }

    /// Serializable summary for provenance records.
    pub fn record(&self) -> ScriptRecord {
        ScriptRecord {
            repository: self.repository().map(|r| r.url().to_string()),
            version: self.version().cloned(),
            main_file: self.main_file.clone(),
        }
    }

    fn pin(&mut self, revision: Revision) {
        self.binding = match std::mem::replace(&mut self.binding, Binding::Unbound) {
            Binding::Tracking(repository) | Binding::Pinned { repository, .. } => {
                Binding::Pinned {
                    repository,
                    revision,
                }
            }
            Binding::Unbound => Binding::Unbound,
        };
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let main_file = self
            .main_file
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(unspecified)".to_string());
        match self.repository() {
            Some(repository) => {
                let version = self
                    .version()
                    .map(|r| format!("r{r}"))
                    .unwrap_or_else(|| "(unpinned)".to_string());
                write!(
                    f,
                    "{} {version} (main file is {main_file})",
                    repository.display_name()
                )
            }
            None => write!(f, "{main_file} (no repository)"),
        }
    }
}

fn open(
    factory: &dyn RepositoryFactory,
    url: Option<&str>,
) -> Result<Option<Box<dyn Repository>>> {
    match url.map(str::trim).filter(|u| !u.is_empty()) {
        Some(url) => {
            let repository = factory.open(url)?;
            if repository.is_none() {
                tracing::warn!(url, "no repository found; script is not under version control");
            }
            Ok(repository)
        }
        None => Ok(None),
    }
}
