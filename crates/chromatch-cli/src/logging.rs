//! Console logging setup.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Install a fmt subscriber. `RUST_LOG` wins over `base_level`.
pub fn init_tracing(base_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(base_level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
