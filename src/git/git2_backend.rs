use anyhow::{Context, Result, anyhow, bail};
use git2::{
    BranchType, Config, Cred, CredentialType, ErrorCode, IndexAddOption, PushOptions,
    RemoteCallbacks, Repository,
};
use std::cell::Cell;
use std::path::{Path, PathBuf};

use super::Git;

/// libgit2 gives up on credentials only when the callback errors, so cap
/// the number of attempts per push.
const MAX_CREDENTIAL_ATTEMPTS: usize = 3;

/// Backend that performs every operation in-process with `git2`.
#[derive(Debug, Clone)]
pub struct Git2Backend {
    workdir: PathBuf,
}

impl Git2Backend {
    pub fn new(workdir: &Path) -> Self {
        Self {
            workdir: workdir.to_path_buf(),
        }
    }

    fn open(&self) -> Result<Repository> {
        Repository::open(&self.workdir)
            .with_context(|| format!("not a git repository: {}", self.workdir.display()))
    }
}

/// Pick the credential libgit2 asked for, the way command-line git would.
///
/// A bare username when the URL carries none, the SSH agent for SSH
/// remotes, configured credential helpers for HTTPS remotes, and finally
/// default credentials.
fn pick_credential(
    url: &str,
    username_from_url: Option<&str>,
    allowed: CredentialType,
) -> Result<Cred, git2::Error> {
    if allowed.contains(CredentialType::USERNAME) {
        return Cred::username(username_from_url.unwrap_or("git"));
    }
    if allowed.contains(CredentialType::SSH_KEY) {
        return Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"));
    }
    if allowed.contains(CredentialType::USER_PASS_PLAINTEXT)
        && let Ok(cfg) = Config::open_default()
        && let Ok(cred) = Cred::credential_helper(&cfg, url, username_from_url)
    {
        return Ok(cred);
    }
    Cred::default()
}

/// Build `RemoteCallbacks` for a push. Any ref the remote refuses to update
/// turns into an error.
fn push_callbacks<'a>(attempts: &'a Cell<usize>) -> RemoteCallbacks<'a> {
    let mut cb = RemoteCallbacks::new();
    cb.credentials(move |url, username_from_url, allowed| {
        attempts.set(attempts.get() + 1);
        if attempts.get() > MAX_CREDENTIAL_ATTEMPTS {
            return Err(git2::Error::from_str("authentication failed"));
        }
        pick_credential(url, username_from_url, allowed)
    });
    cb.push_update_reference(|refname, status| match status {
        Some(msg) => Err(git2::Error::from_str(&format!(
            "remote rejected {}: {}",
            refname, msg
        ))),
        None => Ok(()),
    });
    cb
}

/// Whether HEAD points at a branch that has no commits yet.
fn head_is_unborn(repo: &Repository) -> bool {
    matches!(
        repo.head(),
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound
    )
}

impl Git for Git2Backend {
    fn probe(&self) -> Result<String> {
        let v = git2::Version::get();
        let (major, minor, rev) = v.libgit2_version();
        Ok(format!("libgit2 {}.{}.{}", major, minor, rev))
    }

    fn is_repo(&self) -> bool {
        self.workdir.join(".git").exists()
    }

    fn init(&self) -> Result<()> {
        Repository::init(&self.workdir)
            .with_context(|| format!("git init {}", self.workdir.display()))?;
        Ok(())
    }

    /// Same effect as `git add .`: new and modified files are added and
    /// deleted files are removed from the index, honoring `.gitignore`.
    fn stage_all(&self) -> Result<()> {
        let repo = self.open()?;
        let mut index = repo.index()?;
        index
            .add_all(["*"], IndexAddOption::DEFAULT, None)
            .context("git add")?;
        index.update_all(["*"], None).context("git add")?;
        index.write()?;
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<()> {
        let repo = self.open()?;
        let mut index = repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = repo.find_tree(tree_id)?;

        let parent = if head_is_unborn(&repo) {
            None
        } else {
            Some(repo.head()?.peel_to_commit()?)
        };
        let unchanged = match &parent {
            Some(p) => p.tree_id() == tree_id,
            None => tree.is_empty(),
        };
        if unchanged {
            bail!("nothing to commit");
        }

        let sig = repo
            .signature()
            .context("no committer identity (set user.name and user.email)")?;
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .context("git commit")?;
        Ok(())
    }

    fn remove_remote(&self, name: &str) -> Result<()> {
        let repo = self.open()?;
        repo.remote_delete(name)
            .with_context(|| format!("git remote remove {}", name))?;
        Ok(())
    }

    fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        let repo = self.open()?;
        repo.remote(name, url)
            .with_context(|| format!("git remote add {} {}", name, url))?;
        Ok(())
    }

    /// - Unborn HEAD: repoint HEAD so the first commit lands on `name`.
    /// - Detached HEAD: create (or overwrite) `name` at the commit and attach.
    /// - Otherwise: rename the current branch, overwriting `name` if needed.
    fn rename_branch(&self, name: &str) -> Result<()> {
        let repo = self.open()?;
        let target_ref = format!("refs/heads/{}", name);

        if head_is_unborn(&repo) {
            repo.set_head(&target_ref)?;
            return Ok(());
        }

        let head = repo.head()?;
        if !head.is_branch() {
            let commit = head.peel_to_commit()?;
            repo.branch(name, &commit, true)?;
            repo.set_head(&target_ref)?;
            return Ok(());
        }

        let current = head
            .shorthand()
            .ok_or_else(|| anyhow!("invalid branch name"))?
            .to_string();
        if current == name {
            return Ok(());
        }
        let mut branch = repo.find_branch(&current, BranchType::Local)?;
        branch
            .rename(name, true)
            .with_context(|| format!("git branch -M {}", name))?;
        // keep HEAD attached to the renamed branch
        repo.set_head(&target_ref)?;
        Ok(())
    }

    fn push(&self, remote_name: &str, branch: &str) -> Result<()> {
        let repo = self.open()?;
        let mut remote = repo
            .find_remote(remote_name)
            .with_context(|| format!("remote not configured: {}", remote_name))?;

        let attempts = Cell::new(0);
        let mut opts = PushOptions::new();
        opts.remote_callbacks(push_callbacks(&attempts));

        let refspec = format!("refs/heads/{0}:refs/heads/{0}", branch);
        remote
            .push(&[refspec.as_str()], Some(&mut opts))
            .with_context(|| format!("git push {} {}", remote_name, branch))?;

        let mut local = repo.find_branch(branch, BranchType::Local)?;
        if let Err(e) = local.set_upstream(Some(&format!("{}/{}", remote_name, branch))) {
            tracing::debug!(error = %e, "could not record upstream");
        }
        Ok(())
    }
}
