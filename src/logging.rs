use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt};

/// Log to stderr, filtered by `RUST_LOG` and falling back to `info`
///
/// Safe to call more than once, only the first call installs a subscriber
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    init_with_filter(filter);
}

/// Log to stderr at `level` and above, ignoring `RUST_LOG`
pub fn init_with_level(level: Level) {
    init_with_filter(EnvFilter::default().add_directive(level.into()));
}

fn init_with_filter(filter: EnvFilter) {
    let result = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();

    if result.is_err() {
        tracing::debug!("logging already initialised, keeping the existing subscriber");
    }
}
