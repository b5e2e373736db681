//! Logging initialisation.

use tracing_subscriber::EnvFilter;

/// Initialise the global tracing subscriber.
///
/// `filter` is the configured directive (e.g. `info`, `geolayer=debug`);
/// the `RUST_LOG` environment variable overrides it when set. Returns an
/// error if a subscriber is already installed.
pub fn init_logging(filter: &str) -> Result<(), String> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .map_err(|e| format!("invalid log filter {filter:?}: {e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init()
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_accepts_directive() {
        // First call may install, later calls report the existing one;
        // either way a valid directive must not panic
        let _ = init_logging("geolayer=debug");
    }
}
