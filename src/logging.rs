use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

static LOGGER_INIT: OnceLock<()> = OnceLock::new();

pub const DEFAULT_FILTER: &str = "clipgallery=info,clips=info";

/// Installs the fmt subscriber on stderr. `RUST_LOG` wins over `default_filter`.
/// Safe to call more than once.
pub fn init(default_filter: &str) {
    LOGGER_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
        // Another subscriber may already be set (tests, embedders); keep it.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
