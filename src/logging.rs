use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// Diagnostics go to stderr so they never mix with the workflow's progress
/// output. The filter comes from `PUSHUP_LOG` (same syntax as `RUST_LOG`);
/// without it only warnings are shown, or debug output with `--verbose`.
pub fn init(verbose: bool) {
    let default = if verbose { "pushup=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("PUSHUP_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
