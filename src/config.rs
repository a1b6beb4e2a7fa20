use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::paths::paths;

/// Top-level configuration loaded from `config.toml`.
///
/// Every key is optional; a missing file behaves like an empty one.
///
/// Example TOML:
/// ```toml
/// [git]
/// program = "git"
/// backend = "cli"
///
/// [upload]
/// remote  = "origin"
/// branch  = "main"
/// message = "Initial commit"
/// pause   = false
/// ```
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub git: GitSettings,
    #[serde(default)]
    pub upload: UploadSettings,
}

/// Which implementation of [`crate::git::Git`] runs the workflow.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Invoke the external `git` program.
    #[default]
    Cli,
    /// Run the operations in-process through libgit2.
    Libgit2,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct GitSettings {
    pub program: String,
    pub backend: Backend,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
            backend: Backend::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct UploadSettings {
    pub remote: String,
    pub branch: String,
    pub message: String,
    pub pause: bool,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            branch: "main".to_string(),
            message: "Initial commit".to_string(),
            // A double-clicked console window closes as soon as we exit.
            pause: cfg!(windows),
        }
    }
}

/// Load `config.toml` from the resolved config path.
///
/// # Errors
/// - Returns an error if the file exists but cannot be read.
/// - Returns an error if parsing the TOML fails.
pub fn load_config() -> Result<Config> {
    let p = paths()?;
    load_config_from(&p.config)
}

/// Load configuration from an explicit path, falling back to defaults when
/// the file does not exist.
pub fn load_config_from(path: &Path) -> Result<Config> {
    let txt = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read config: {}", path.display()));
        }
    };
    let cfg: Config = toml::from_str(&txt)
        .with_context(|| format!("failed to parse config: {}", path.display()))?;
    Ok(cfg)
}
