//! Log output setup
//!
//! Messages go to stderr as compact lines. The filter comes from, in order:
//! `-v` (debug), the `RUST_LOG` environment variable, the optional
//! `[logging] level` entry of the configuration file, then `ciqw=info`.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{CiqwError, Result};

/// Filter used when nothing else is configured
pub const DEFAULT_FILTER: &str = "ciqw=info";

/// Filter used with `-v`
const VERBOSE_FILTER: &str = "ciqw=debug";

/// Pick the filter directive from the available sources
pub fn filter_directive(
    verbose: bool,
    rust_log: Option<String>,
    configured: Option<String>,
) -> String {
    if verbose {
        return VERBOSE_FILTER.to_string();
    }
    rust_log
        .filter(|value| !value.trim().is_empty())
        .or(configured)
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Install the global subscriber
pub fn init(verbose: bool, configured: Option<String>) -> Result<()> {
    let directive = filter_directive(verbose, std::env::var("RUST_LOG").ok(), configured);
    let env_filter =
        EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(console::colors_enabled_stderr())
                .with_target(false)
                .without_time()
                .compact(),
        )
        .try_init()
        .map_err(|e| CiqwError::IoError {
            message: format!("Failed to initialize logging: {e}"),
        })
}
