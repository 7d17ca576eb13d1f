//! Diagnostics setup
//!
//! Events go to stderr so they never mix with command output. The filter
//! comes from `BITLET_LOG` (e.g. `debug` or `bitlet::artifacts::merge=debug`)
//! and defaults to warnings only.

use is_terminal::IsTerminal;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "BITLET_LOG";
const DEFAULT_LOG_LEVEL: &str = "warn";

pub fn init_logging() -> anyhow::Result<()> {
    let filter = build_env_filter();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))
}

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}
