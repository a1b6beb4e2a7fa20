use anyhow::{Context, Result, bail};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::Git;

/// Backend that runs the external `git` program.
///
/// Every operation is a single command run inside `workdir`. git's own
/// output goes straight to the terminal so the operator sees what happened;
/// only the exit status decides success.
#[derive(Debug, Clone)]
pub struct CliGit {
    program: OsString,
    workdir: PathBuf,
}

impl CliGit {
    pub fn new(program: impl Into<OsString>, workdir: &Path) -> Self {
        Self {
            program: program.into(),
            workdir: workdir.to_path_buf(),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(args).current_dir(&self.workdir);
        cmd
    }

    /// Run `git <args>` and fail on a non-zero exit status.
    ///
    /// With `quiet` set, stderr is discarded (used for best-effort steps whose
    /// failure is expected and uninteresting).
    fn run(&self, args: &[&str], quiet: bool) -> Result<()> {
        let mut cmd = self.command(args);
        if quiet {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        }
        tracing::debug!(program = ?self.program, ?args, "running git");

        let status = cmd
            .status()
            .with_context(|| format!("failed to run {}", self.program.to_string_lossy()))?;
        if !status.success() {
            bail!("git {} exited with {}", args.join(" "), status);
        }
        Ok(())
    }
}

impl Git for CliGit {
    fn probe(&self) -> Result<String> {
        let out = self
            .command(&["--version"])
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .with_context(|| format!("{} not found", self.program.to_string_lossy()))?;
        if !out.status.success() {
            bail!("{} --version exited with {}", self.program.to_string_lossy(), out.status);
        }
        Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
    }

    fn is_repo(&self) -> bool {
        self.workdir.join(".git").exists()
    }

    fn init(&self) -> Result<()> {
        self.run(&["init"], false)
    }

    fn stage_all(&self) -> Result<()> {
        self.run(&["add", "."], false)
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.run(&["commit", "-m", message], false)
    }

    fn remove_remote(&self, name: &str) -> Result<()> {
        self.run(&["remote", "remove", name], true)
    }

    fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        self.run(&["remote", "add", name, url], false)
    }

    fn rename_branch(&self, name: &str) -> Result<()> {
        self.run(&["branch", "-M", name], false)
    }

    fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["push", "-u", remote, branch], false)
    }
}
