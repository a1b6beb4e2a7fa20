use anyhow::Result;
use std::io::{self, Write};

/// Print the quick-start guide.
///
/// The guide lives in `assets/GUIDE.md` and is embedded at compile time with
/// [`include_str!`], so it always matches the binary that points to it.
///
/// # Errors
/// Returns an error if writing to `stdout` fails.
pub fn cmd_guide() -> Result<()> {
    io::stdout().write_all(GUIDE.as_bytes())?;
    Ok(())
}

pub const GUIDE: &str = include_str!("../assets/GUIDE.md");
