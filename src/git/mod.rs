//! Git integration layer.
//!
//! The upload workflow only talks to the [`Git`] trait. Two backends exist:
//! [`CliGit`] shells out to the external `git` program, [`Git2Backend`]
//! performs the same operations in-process through the `git2` crate.
//!
//! Callers only ever look at whether an operation succeeded; the output of
//! the underlying tool is never parsed.

mod cli_backend;
mod git2_backend;

use anyhow::Result;
use std::path::Path;

use crate::config::{Backend, GitSettings};

pub use cli_backend::CliGit;
pub use git2_backend::Git2Backend;

/// The operations the upload workflow performs on a working directory.
pub trait Git {
    /// Check that the tool is usable and return a version string.
    fn probe(&self) -> Result<String>;

    /// Whether the working directory already holds a repository marker.
    fn is_repo(&self) -> bool;

    fn init(&self) -> Result<()>;

    /// Stage every change in the working directory (`git add .`).
    fn stage_all(&self) -> Result<()>;

    /// Record staged changes. Fails when there is nothing to commit.
    fn commit(&self, message: &str) -> Result<()>;

    fn remove_remote(&self, name: &str) -> Result<()>;

    fn add_remote(&self, name: &str, url: &str) -> Result<()>;

    /// Force-rename the current branch (`git branch -M <name>`).
    fn rename_branch(&self, name: &str) -> Result<()>;

    /// Push `branch` to `remote` and record it as the upstream.
    fn push(&self, remote: &str, branch: &str) -> Result<()>;
}

/// Build the backend selected in the configuration for `workdir`.
pub fn backend_for(settings: &GitSettings, workdir: &Path) -> Box<dyn Git> {
    match settings.backend {
        Backend::Cli => Box::new(CliGit::new(&settings.program, workdir)),
        Backend::Libgit2 => Box::new(Git2Backend::new(workdir)),
    }
}
