use tracing_subscriber::EnvFilter;

/// Installs a global fmt subscriber writing to stderr. `RUST_LOG` wins when
/// set; otherwise `verbose` picks between warnings only and debug output.
/// Later calls are no-ops.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "shoebox=debug" } else { "shoebox=warn" };
    let env_filter = std::env::var("RUST_LOG")
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new(default));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
