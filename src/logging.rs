//! Diagnostics on stderr via `tracing`; report output stays on stdout.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "NIGHTWATCH_LOG";

/// Filter directive used when `NIGHTWATCH_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}

/// Install the global subscriber. `NIGHTWATCH_LOG` wins over `--verbose`.
/// Safe to call more than once; later calls are ignored.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_levels() {
        assert_eq!(default_directive(false), "warn");
        assert_eq!(default_directive(true), "debug");
    }

    #[test]
    fn init_twice_is_harmless() {
        init(false);
        init(true);
        tracing::warn!("logging initialized");
    }
}
