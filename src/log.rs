use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber. `RUST_LOG` picks the level, `warn` otherwise.
/// Stdout is left to the simulator's own output.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_level(true)
        // The target is mostly noise for a single crate.
        .with_target(false)
        .without_time()
        .init();
}
