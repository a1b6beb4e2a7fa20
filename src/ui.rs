//! Terminal output helpers shared by the commands.

use colored::Colorize;
use indicatif::ProgressStyle;
use std::io::{self, BufRead, Write};

/// Spinner style used during ongoing operations.
/// - Yellow spinner with animated braille-style frames.
/// - Displays the current message (`{wide_msg}`) next to the spinner.
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("\x1b[33m{spinner}\x1b[0m {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"])
}

/// `[n/total] message` progress banner.
pub fn step(out: &mut dyn Write, n: usize, total: usize, msg: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{} {}", format!("[{}/{}]", n, total).cyan().bold(), msg)
}

pub fn info(out: &mut dyn Write, msg: &str) -> io::Result<()> {
    writeln!(out, "      {}", msg)
}

pub fn ok(out: &mut dyn Write, msg: &str) -> io::Result<()> {
    writeln!(out, "{} {}", "✔".green(), msg)
}

pub fn warn(out: &mut dyn Write, msg: &str) -> io::Result<()> {
    writeln!(out, "{} {}", "!".yellow().bold(), msg.yellow())
}

pub fn error(out: &mut dyn Write, msg: &str) -> io::Result<()> {
    writeln!(out, "{} {}", "✘".red().bold(), msg.red())
}

/// Wait for the operator to press Enter.
pub fn pause(input: &mut dyn BufRead, out: &mut dyn Write) -> io::Result<()> {
    write!(out, "\nPress Enter to exit...")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}
