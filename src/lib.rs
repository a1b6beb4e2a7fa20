//! Crate entry point for **pushup**.
//!
//! This library provides the implementation behind the `pushup` CLI, which
//! publishes a local project directory to a GitHub repository.
//! Each submodule encapsulates one responsibility (configuration, git
//! backends, the upload workflow, terminal output).
//! The `pub use` re-exports make the commands accessible from the crate root.

mod config;
mod git;
mod guide;
pub mod logging;
mod paths;
mod ui;
mod upload;

pub use config::{Backend, GitSettings};
pub use git::{CliGit, Git, Git2Backend, backend_for};
pub use guide::cmd_guide;
pub use paths::pushup_home;
pub use upload::{
    Prompt, UploadArgs, UploadError, UploadOptions, cmd_upload, read_answer, run_upload,
};
