//! Shared observability wiring for Signet binaries.

/// Logging configuration and subscriber installation.
pub mod logging;

/// Install process-wide structured logging.
///
/// Convenience wrapper over [`logging::init`]; safe to call more than once.
pub fn init() {
    logging::init();
}
