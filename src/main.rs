//! # pushup
//!
//! **pushup** publishes a local project directory to a GitHub repository.
//!
//! Features:
//! - `pushup upload` checks for git, initializes the repository if needed,
//!   stages and commits everything, asks for the remote URL and pushes
//! - `pushup guide` prints the quick-start guide with the manual steps
//! - `pushup home` prints the configuration directory
//!
//! This CLI is built with [clap](https://docs.rs/clap).

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use pushup::{Backend, UploadArgs, cmd_guide, cmd_upload, logging, pushup_home};
use std::path::PathBuf;
use std::process::ExitCode;

/// Command-line interface definition.
#[derive(Parser, Debug)]
#[command(
    name = "pushup",
    version,
    about = "pushup - publish a local project to GitHub",
    arg_required_else_help = true
)]
struct Cli {
    /// Show debug diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Initialize, commit and push the working directory
    Upload(UploadCli),
    /// Print the quick-start guide
    Guide,
    /// Print the configuration directory
    Home,
}

#[derive(Args, Debug)]
struct UploadCli {
    /// Project directory (defaults to the current directory)
    #[arg(short = 'C', long = "dir", value_name = "DIR")]
    dir: Option<PathBuf>,
    /// Repository URL; skips the interactive prompt
    #[arg(long)]
    url: Option<String>,
    /// Remote name
    #[arg(long)]
    remote: Option<String>,
    /// Branch name to push
    #[arg(long)]
    branch: Option<String>,
    /// Commit message
    #[arg(short, long)]
    message: Option<String>,
    /// Git backend
    #[arg(long, value_enum)]
    backend: Option<Backend>,
    /// Path to the git executable
    #[arg(long, value_name = "PATH")]
    git: Option<String>,
    /// Wait for Enter before exiting
    #[arg(long, overrides_with = "no_pause")]
    pause: bool,
    /// Exit immediately
    #[arg(long, overrides_with = "pause")]
    no_pause: bool,
}

impl From<UploadCli> for UploadArgs {
    fn from(c: UploadCli) -> Self {
        let pause = match (c.pause, c.no_pause) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        UploadArgs {
            workdir: c.dir,
            url: c.url,
            remote: c.remote,
            branch: c.branch,
            message: c.message,
            backend: c.backend,
            git: c.git,
            pause,
        }
    }
}

/// Exit code for a rejected command line: 0 for `--help`/`--version`,
/// otherwise 1 (the only failure code pushup uses).
fn usage_exit_code(e: &clap::Error) -> u8 {
    if e.use_stderr() { 1 } else { 0 }
}

/// CLI entry point.
///
/// Parses arguments with `clap` and executes the selected subcommand.
fn main() -> Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return Ok(ExitCode::from(usage_exit_code(&e)));
        }
    };
    logging::init(cli.verbose);

    let Some(cmd) = cli.cmd else {
        return Ok(ExitCode::SUCCESS);
    };

    match cmd {
        Cmd::Upload(args) => cmd_upload(args.into()),
        Cmd::Guide => cmd_guide().map(|_| ExitCode::SUCCESS),
        Cmd::Home => {
            println!("{}", pushup_home()?.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}
