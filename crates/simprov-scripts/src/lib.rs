//! Versioned simulation scripts.
//!
//! A [`Script`] binds an entry-point file to a version-control
//! [`Repository`] and decides which revision is in effect on disk. The
//! repository itself (checkout, revision switching, change detection) is an
//! external collaborator reached only through the traits in [`repository`].

pub mod error;
pub mod repository;
pub mod script;

// Re-exports for convenience.
pub use error::{Result, ScriptError};
pub use repository::{Repository, RepositoryFactory, Revision};
pub use script::{Script, ScriptRecord, ScriptState};
