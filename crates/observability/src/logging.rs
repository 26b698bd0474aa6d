//! Subscriber installation.
//!
//! JSON output by default so log shippers get structured events; a plain
//! compact format is available for local development via
//! [`ENV_LOG_FORMAT`].

use tracing_subscriber::EnvFilter;

/// Selects the log format: `json` (default) or `plain`.
pub const ENV_LOG_FORMAT: &str = "SIGNET_LOG_FORMAT";

/// Fallback filter when `RUST_LOG` is unset: quiet dependencies, verbose
/// signet crates.
const DEFAULT_FILTER: &str = "info,signet_api=debug,signet_auth=debug";

/// Install the process-wide subscriber.
///
/// Filterable via `RUST_LOG`. Safe to call more than once; later calls are
/// no-ops.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let plain = std::env::var(ENV_LOG_FORMAT).is_ok_and(|v| v.eq_ignore_ascii_case("plain"));

    if plain {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .flatten_event(true)
            .try_init();
    }
}
