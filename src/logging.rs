//! Logging setup. Everything in the crate logs through `tracing`; this installs the
//! subscriber that prints it.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info";

/// Installs a console subscriber. `RUST_LOG` wins over `level`; an empty `level`
/// falls back to `info`. Calling this twice is harmless, the second call does nothing.
pub fn init_logging(level: &str) {
    let filter_str = if level.trim().is_empty() {
        DEFAULT_FILTER
    } else {
        level
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter_str))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    // Already initialized (tests, mostly)
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init();
}
