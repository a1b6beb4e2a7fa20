mod error;
mod prompt;

use anyhow::Result;
use indicatif::ProgressBar;
use std::env;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use crate::config::{Backend, Config, GitSettings, load_config};
use crate::git::{Git, backend_for};
use crate::ui;

pub use error::UploadError;
pub use prompt::{Prompt, StdinPrompt, read_answer};

const TOTAL_STEPS: usize = 5;

pub const URL_PROMPT: &str =
    "Enter your GitHub repository URL (e.g. https://github.com/user/repo.git)";

/// Effective settings for one upload run.
#[derive(Debug, Clone)]
pub struct UploadOptions {
    pub remote: String,
    pub branch: String,
    pub message: String,
    /// Skip the prompt and use this URL.
    pub url: Option<String>,
    /// Show a spinner while pushing. Off when output is not a terminal.
    pub spinner: bool,
}

/// Command-line overrides for the configuration file.
#[derive(Debug, Clone, Default)]
pub struct UploadArgs {
    pub workdir: Option<PathBuf>,
    pub url: Option<String>,
    pub remote: Option<String>,
    pub branch: Option<String>,
    pub message: Option<String>,
    pub backend: Option<Backend>,
    pub git: Option<String>,
    pub pause: Option<bool>,
}

/// CLI command: run the upload workflow in the working directory.
///
/// Loads `config.toml`, applies the command-line overrides, picks the git
/// backend and runs [`run_upload`] against the real terminal. Workflow
/// failures are reported on stdout and turned into exit code 1.
///
/// # Errors
/// Returns an error only if the configuration cannot be loaded or the
/// working directory cannot be determined.
pub fn cmd_upload(args: UploadArgs) -> Result<ExitCode> {
    let cfg = load_config()?;
    let workdir = match &args.workdir {
        Some(d) => d.clone(),
        None => env::current_dir()?,
    };
    let (settings, mut opts, pause) = resolve(cfg, args);
    tracing::debug!(workdir = %workdir.display(), backend = ?settings.backend, "starting upload");

    let git = backend_for(&settings, &workdir);
    // command-line git may ask for credentials on the terminal
    opts.spinner = settings.backend == Backend::Libgit2 && io::stderr().is_terminal();

    let mut out = io::stdout().lock();
    let res = run_upload(git.as_ref(), &mut StdinPrompt, &mut out, &opts);
    let code = match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = ExitCode::from(e.exit_code());
            match e {
                UploadError::Git { .. } | UploadError::Io(_) | UploadError::Prompt(_) => {
                    let _ = ui::error(&mut out, &format!("{:#}", anyhow::Error::from(e)));
                }
                other => tracing::debug!(error = ?other, "upload aborted"),
            }
            code
        }
    };

    if pause {
        let _ = ui::pause(&mut io::stdin().lock(), &mut out);
    }
    Ok(code)
}

/// Merge command-line overrides into the loaded configuration.
///
/// A flag always beats the file, and the file beats the built-in default
/// (already applied by [`load_config`]). Returns the git settings, the
/// workflow options (spinner off) and whether to pause before exiting.
pub fn resolve(cfg: Config, args: UploadArgs) -> (GitSettings, UploadOptions, bool) {
    let mut git = cfg.git;
    if let Some(b) = args.backend {
        git.backend = b;
    }
    if let Some(p) = args.git {
        git.program = p;
    }
    let opts = UploadOptions {
        remote: args.remote.unwrap_or(cfg.upload.remote),
        branch: args.branch.unwrap_or(cfg.upload.branch),
        message: args.message.unwrap_or(cfg.upload.message),
        url: args.url,
        spinner: false,
    };
    let pause = args.pause.unwrap_or(cfg.upload.pause);
    (git, opts, pause)
}

fn print_push_causes(out: &mut dyn Write) -> io::Result<()> {
    ui::error(out, "Push failed. Possible causes:")?;
    ui::info(out, "1. The repository URL is wrong.")?;
    ui::info(out, "2. The repository has not been created on GitHub yet.")?;
    ui::info(out, "3. Authorization failed (check your login or access token).")
}

/// Publish the working directory to a hosted repository.
///
/// Flow:
/// 0. Check that git answers a version query. Nothing else runs otherwise.
/// 1. `git init` unless a repository already exists.
/// 2. `git add .`
/// 3. `git commit -m <message>`; failure (usually "nothing to commit") is a
///    warning, not an error.
/// 4. Ask for the remote URL, reject empty input, then replace the remote.
/// 5. `git branch -M <branch>` and `git push -u <remote> <branch>`.
///
/// Every step checks only whether the git operation succeeded.
///
/// # Errors
/// Returns [`UploadError`] for the fatal cases: git missing, empty URL,
/// push failure (including a failed branch rename), or a git operation that
/// should never fail (init, add, remote add).
pub fn run_upload(
    git: &dyn Git,
    prompt: &mut dyn Prompt,
    out: &mut dyn Write,
    opts: &UploadOptions,
) -> Result<(), UploadError> {
    ui::info(out, "Checking for git...")?;
    match git.probe() {
        Ok(version) => {
            tracing::debug!(%version, "git found");
            ui::ok(out, &format!("Found {}", version))?;
        }
        Err(e) => {
            ui::error(out, "Git is not installed or not on PATH.")?;
            ui::info(out, "Install it from https://git-scm.com/downloads and try again.")?;
            return Err(UploadError::GitMissing(e));
        }
    }

    ui::step(out, 1, TOTAL_STEPS, "Initializing repository...")?;
    if git.is_repo() {
        ui::info(out, "Repository already exists, skipping.")?;
    } else {
        git.init().map_err(|source| UploadError::Git {
            step: "git init",
            source,
        })?;
        ui::ok(out, "Repository initialized.")?;
    }

    ui::step(out, 2, TOTAL_STEPS, "Staging files...")?;
    git.stage_all().map_err(|source| UploadError::Git {
        step: "git add",
        source,
    })?;
    ui::ok(out, "All files staged.")?;

    ui::step(out, 3, TOTAL_STEPS, "Creating commit...")?;
    match git.commit(&opts.message) {
        Ok(()) => ui::ok(out, &format!("Committed: {}", opts.message))?,
        Err(e) => {
            tracing::debug!(error = %format!("{e:#}"), "commit failed");
            ui::warn(out, "Nothing to commit or commit failed, continuing.")?;
        }
    }

    ui::step(out, 4, TOTAL_STEPS, "Configuring remote...")?;
    let answer = match &opts.url {
        Some(u) => u.clone(),
        None => {
            out.flush()?;
            prompt.ask(URL_PROMPT).map_err(UploadError::Prompt)?
        }
    };
    let url = answer.trim();
    if url.is_empty() {
        ui::error(out, "Repository URL must not be empty.")?;
        return Err(UploadError::EmptyUrl);
    }
    if let Err(e) = git.remove_remote(&opts.remote) {
        tracing::debug!(remote = %opts.remote, error = %e, "no previous remote to remove");
    }
    git.add_remote(&opts.remote, url)
        .map_err(|source| UploadError::Git {
            step: "git remote add",
            source,
        })?;
    ui::ok(out, &format!("Remote {} -> {}", opts.remote, url))?;

    ui::step(out, 5, TOTAL_STEPS, &format!("Pushing to {}...", opts.branch))?;
    if let Err(e) = git.rename_branch(&opts.branch) {
        print_push_causes(out)?;
        return Err(UploadError::PushFailed(e));
    }
    out.flush()?;

    let pb = opts.spinner.then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ui::spinner_style());
        pb.set_message(format!("pushing {} to {}", opts.branch, opts.remote));
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    });
    let pushed = git.push(&opts.remote, &opts.branch);
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    if let Err(e) = pushed {
        print_push_causes(out)?;
        return Err(UploadError::PushFailed(e));
    }

    writeln!(out)?;
    ui::ok(out, "Project uploaded successfully!")?;
    ui::info(out, "Next steps: run `pushup guide` for the deployment notes.")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use std::cell::{Cell, RefCell};

    /// Records every call; individual operations can be told to fail.
    #[derive(Default)]
    struct FakeGit {
        calls: RefCell<Vec<String>>,
        missing: bool,
        repo: Cell<bool>,
        remote: RefCell<Option<String>>,
        fail_commit: bool,
        fail_rename: bool,
        fail_push: bool,
    }

    impl FakeGit {
        fn log(&self, s: impl Into<String>) {
            self.calls.borrow_mut().push(s.into());
        }
        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl Git for FakeGit {
        fn probe(&self) -> Result<String> {
            self.log("probe");
            if self.missing {
                Err(anyhow!("git not found"))
            } else {
                Ok("git version 2.45.0".to_string())
            }
        }
        fn is_repo(&self) -> bool {
            self.repo.get()
        }
        fn init(&self) -> Result<()> {
            self.log("init");
            self.repo.set(true);
            Ok(())
        }
        fn stage_all(&self) -> Result<()> {
            self.log("add");
            Ok(())
        }
        fn commit(&self, message: &str) -> Result<()> {
            self.log(format!("commit {}", message));
            if self.fail_commit {
                Err(anyhow!("nothing to commit"))
            } else {
                Ok(())
            }
        }
        fn remove_remote(&self, name: &str) -> Result<()> {
            self.log(format!("remote remove {}", name));
            match self.remote.borrow_mut().take() {
                Some(_) => Ok(()),
                None => Err(anyhow!("no such remote")),
            }
        }
        fn add_remote(&self, name: &str, url: &str) -> Result<()> {
            self.log(format!("remote add {} {}", name, url));
            let mut r = self.remote.borrow_mut();
            if r.is_some() {
                return Err(anyhow!("remote {} already exists", name));
            }
            *r = Some(url.to_string());
            Ok(())
        }
        fn rename_branch(&self, name: &str) -> Result<()> {
            self.log(format!("branch -M {}", name));
            if self.fail_rename {
                Err(anyhow!("not a valid branch name"))
            } else {
                Ok(())
            }
        }
        fn push(&self, remote: &str, branch: &str) -> Result<()> {
            self.log(format!("push -u {} {}", remote, branch));
            if self.fail_push {
                Err(anyhow!("authentication failed"))
            } else {
                Ok(())
            }
        }
    }

    struct Answers(Vec<String>);

    impl Prompt for Answers {
        fn ask(&mut self, _question: &str) -> Result<String> {
            Ok(if self.0.is_empty() {
                String::new()
            } else {
                self.0.remove(0)
            })
        }
    }

    fn answers(a: &[&str]) -> Answers {
        Answers(a.iter().map(|s| s.to_string()).collect())
    }

    fn opts() -> UploadOptions {
        UploadOptions {
            remote: "origin".to_string(),
            branch: "main".to_string(),
            message: "Initial commit".to_string(),
            url: None,
            spinner: false,
        }
    }

    fn run(git: &FakeGit, prompt: &mut Answers, o: &UploadOptions) -> (Result<(), UploadError>, String) {
        let mut out = Vec::new();
        let res = run_upload(git, prompt, &mut out, o);
        (res, String::from_utf8(out).unwrap())
    }

    #[test]
    fn happy_path_runs_every_step_in_order() {
        let git = FakeGit::default();
        let (res, out) = run(&git, &mut answers(&["https://github.com/alice/demo.git"]), &opts());

        assert!(res.is_ok());
        assert_eq!(
            git.calls(),
            vec![
                "probe",
                "init",
                "add",
                "commit Initial commit",
                "remote remove origin",
                "remote add origin https://github.com/alice/demo.git",
                "branch -M main",
                "push -u origin main",
            ]
        );
        for n in 1..=5 {
            assert!(out.contains(&format!("[{}/5]", n)));
        }
        assert!(out.contains("Project uploaded successfully!"));
        assert!(out.contains("pushup guide"));
    }

    #[test]
    fn missing_git_aborts_before_any_mutation() {
        let git = FakeGit {
            missing: true,
            ..Default::default()
        };
        let (res, out) = run(&git, &mut answers(&["https://github.com/alice/demo.git"]), &opts());

        let err = res.unwrap_err();
        assert!(matches!(err, UploadError::GitMissing(_)));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(git.calls(), vec!["probe"]);
        assert!(out.contains("https://git-scm.com/downloads"));
    }

    #[test]
    fn existing_repository_skips_init() {
        let git = FakeGit::default();
        git.repo.set(true);
        let (res, out) = run(&git, &mut answers(&["https://github.com/alice/demo.git"]), &opts());

        assert!(res.is_ok());
        assert!(!git.calls().contains(&"init".to_string()));
        assert!(out.contains("already exists, skipping"));
    }

    #[test]
    fn failed_commit_warns_and_continues() {
        let git = FakeGit {
            fail_commit: true,
            ..Default::default()
        };
        let (res, out) = run(&git, &mut answers(&["https://github.com/alice/demo.git"]), &opts());

        assert!(res.is_ok());
        assert!(out.contains("Nothing to commit or commit failed"));
        let calls = git.calls();
        assert!(calls.contains(&"remote add origin https://github.com/alice/demo.git".to_string()));
        assert_eq!(calls.last().map(String::as_str), Some("push -u origin main"));
    }

    #[test]
    fn empty_url_aborts_before_remote_configuration() {
        for input in ["", "   "] {
            let git = FakeGit::default();
            let (res, out) = run(&git, &mut answers(&[input]), &opts());

            let err = res.unwrap_err();
            assert!(matches!(err, UploadError::EmptyUrl));
            assert_eq!(err.exit_code(), 1);
            assert!(git.calls().iter().all(|c| !c.starts_with("remote")));
            assert!(git.calls().iter().all(|c| !c.starts_with("push")));
            assert!(out.contains("must not be empty"));
        }
    }

    #[test]
    fn existing_remote_is_replaced() {
        let git = FakeGit::default();
        *git.remote.borrow_mut() = Some("https://github.com/alice/old.git".to_string());
        let (res, _) = run(&git, &mut answers(&["https://github.com/alice/demo.git"]), &opts());

        assert!(res.is_ok());
        assert_eq!(
            git.remote.borrow().as_deref(),
            Some("https://github.com/alice/demo.git")
        );
    }

    #[test]
    fn push_failure_lists_probable_causes() {
        let git = FakeGit {
            fail_push: true,
            ..Default::default()
        };
        let (res, out) = run(&git, &mut answers(&["https://github.com/alice/demo.git"]), &opts());

        let err = res.unwrap_err();
        assert!(matches!(err, UploadError::PushFailed(_)));
        assert_eq!(err.exit_code(), 1);
        assert!(out.contains("Push failed"));
        assert!(out.contains("URL is wrong"));
        assert!(out.contains("not been created on GitHub"));
        assert!(out.contains("Authorization failed"));
        assert!(!out.contains("uploaded successfully"));
    }

    #[test]
    fn preset_url_skips_prompt_and_is_trimmed() {
        let git = FakeGit::default();
        let mut o = opts();
        o.url = Some("  https://github.com/alice/demo.git \n".to_string());
        o.branch = "trunk".to_string();
        let mut prompt = answers(&["https://github.com/someone/else.git"]);
        let (res, _) = run(&git, &mut prompt, &o);

        assert!(res.is_ok());
        assert_eq!(prompt.0.len(), 1);
        let calls = git.calls();
        assert!(calls.contains(&"remote add origin https://github.com/alice/demo.git".to_string()));
        assert!(calls.contains(&"branch -M trunk".to_string()));
        assert!(calls.contains(&"push -u origin trunk".to_string()));
    }

    #[test]
    fn failed_rename_reports_push_causes_without_pushing() {
        let git = FakeGit {
            fail_rename: true,
            ..Default::default()
        };
        let (res, out) = run(&git, &mut answers(&["https://github.com/alice/demo.git"]), &opts());

        let err = res.unwrap_err();
        assert!(matches!(err, UploadError::PushFailed(_)));
        assert_eq!(err.exit_code(), 1);
        assert!(out.contains("Push failed. Possible causes:"));
        assert!(out.contains("URL is wrong"));
        assert!(out.contains("not been created on GitHub"));
        assert!(out.contains("Authorization failed"));
        assert!(git.calls().iter().all(|c| !c.starts_with("push")));
    }

    fn file_config() -> Config {
        let mut cfg = Config::default();
        cfg.git.program = "/opt/git/bin/git".to_string();
        cfg.upload.remote = "github".to_string();
        cfg.upload.branch = "trunk".to_string();
        cfg.upload.message = "First upload".to_string();
        cfg.upload.pause = true;
        cfg
    }

    #[test]
    fn resolve_without_flags_keeps_file_values() {
        let (git, o, pause) = resolve(file_config(), UploadArgs::default());
        assert_eq!(git.program, "/opt/git/bin/git");
        assert_eq!(git.backend, Backend::Cli);
        assert_eq!(o.remote, "github");
        assert_eq!(o.branch, "trunk");
        assert_eq!(o.message, "First upload");
        assert_eq!(o.url, None);
        assert!(!o.spinner);
        assert!(pause);
    }

    #[test]
    fn resolve_flags_beat_file_values() {
        let args = UploadArgs {
            url: Some("https://github.com/alice/demo.git".to_string()),
            remote: Some("origin".to_string()),
            branch: Some("main".to_string()),
            message: Some("Release".to_string()),
            backend: Some(Backend::Libgit2),
            git: Some("git2.exe".to_string()),
            pause: Some(false),
            ..Default::default()
        };
        let (git, o, pause) = resolve(file_config(), args);
        assert_eq!(git.program, "git2.exe");
        assert_eq!(git.backend, Backend::Libgit2);
        assert_eq!(o.remote, "origin");
        assert_eq!(o.branch, "main");
        assert_eq!(o.message, "Release");
        assert_eq!(o.url.as_deref(), Some("https://github.com/alice/demo.git"));
        assert!(!pause);
    }

    #[test]
    fn resolve_falls_back_to_defaults() {
        let (git, o, pause) = resolve(Config::default(), UploadArgs::default());
        assert_eq!(git.program, "git");
        assert_eq!(o.remote, "origin");
        assert_eq!(o.branch, "main");
        assert_eq!(o.message, "Initial commit");
        assert_eq!(pause, cfg!(windows));
    }
}
