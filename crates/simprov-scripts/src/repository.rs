//! Repository collaborator interface.
//!
//! Concrete version-control backends live outside this crate. They are
//! constructed from a URL by a [`RepositoryFactory`] and driven through the
//! [`Repository`] trait.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Opaque identifier of one state of a repository's content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(String);

impl Revision {
    pub fn new(id: impl Into<String>) -> Self {
        Revision(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Revision {
    fn from(s: &str) -> Self {
        Revision::new(s)
    }
}

impl From<String> for Revision {
    fn from(s: String) -> Self {
        Revision(s)
    }
}

/// A version-control repository and its local working copy.
///
/// Operations block until complete; timeouts and retries are the
/// implementation's concern.
pub trait Repository: fmt::Debug {
    /// The URL this repository was opened from.
    fn url(&self) -> &str;

    /// Whether a local working copy exists.
    fn has_working_copy(&self) -> bool;

    /// Materialize a local working copy.
    fn checkout(&mut self) -> Result<()>;

    /// Revision the working copy is currently at.
    fn current_revision(&self) -> Result<Revision>;

    /// Whether the working copy's content differs from the tracked state.
    fn has_changed(&self) -> Result<bool>;

    /// Move the working copy to `revision`.
    fn use_revision(&mut self, revision: &Revision) -> Result<()>;

    /// Human-readable form used when rendering scripts.
    fn display_name(&self) -> String {
        self.url().to_string()
    }
}

/// Builds repositories from URLs.
pub trait RepositoryFactory {
    /// Open the repository at `url`, or `None` if the URL names no
    /// repository this factory understands.
    fn open(&self, url: &str) -> Result<Option<Box<dyn Repository>>>;
}

impl<F> RepositoryFactory for F
where
    F: Fn(&str) -> Result<Option<Box<dyn Repository>>>,
{
    fn open(&self, url: &str) -> Result<Option<Box<dyn Repository>>> {
        self(url)
    }
}
