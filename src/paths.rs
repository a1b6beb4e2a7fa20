use anyhow::Result;
use std::{env, path::PathBuf};

#[derive(Clone, Debug)]
pub struct Paths {
    pub config: PathBuf,
}

/// Directory holding pushup's configuration.
///
/// `$XDG_CONFIG_HOME/pushup`, or `$HOME/.config/pushup` when XDG is unset.
pub fn pushup_home() -> Result<PathBuf> {
    let xdg = env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty());
    let base = xdg
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env::var_os("HOME").unwrap_or_default()).join(".config"));
    Ok(base.join("pushup"))
}

pub fn paths() -> Result<Paths> {
    let home = pushup_home()?;
    let config = match env::var_os("PUSHUP_CONFIG").filter(|v| !v.is_empty()) {
        Some(p) => PathBuf::from(p),
        None => home.join("config.toml"),
    };
    Ok(Paths { config })
}
