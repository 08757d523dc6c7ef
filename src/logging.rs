//! Logging initialisation via tracing-subscriber.
//!
//! Binaries call [`init`] once at startup. Library code only emits `tracing` events.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Initialises the global subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence; `level` is the fallback. `verbose` forces `debug`.
pub fn init(level: &str, verbose: bool) -> Result<(), String> {
    let level = if verbose { "debug" } else { level };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| format!("invalid log level '{level}': {e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| format!("failed to set subscriber: {e}"))
}

/// Parses a log level string, rejecting unknown values.
pub fn parse_level(level: &str) -> Result<LevelFilter, String> {
    if level.is_empty() {
        return Err("log level must not be empty".to_string());
    }
    level
        .parse::<LevelFilter>()
        .map_err(|_| format!("unrecognised log level: '{level}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_levels_parse() {
        for l in &["error", "warn", "info", "debug", "trace"] {
            assert!(parse_level(l).is_ok(), "expected '{l}' to be valid");
        }
    }

    #[test]
    fn invalid_levels_error() {
        assert!(parse_level("verbose").is_err());
        assert!(parse_level("").is_err());
    }
}
