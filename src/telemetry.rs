use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

use crate::config::TelemetryConfig;
use crate::error::TelemetryError;

/// Installs the global subscriber on stderr; stdout carries report and JSON
/// output only.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let stderr = std::io::stderr();
    let ansi = stderr.is_terminal();

    tracing_subscriber::fmt()
        .with_env_filter(filter(&config.log_level)?)
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

/// RUST_LOG wins; INTERVIEW_LOG_LEVEL is the fallback.
fn filter(fallback: &str) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(fallback).map_err(|source| TelemetryError::EnvFilter {
        value: fallback.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_fallback_level_is_reported() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }

        let err = filter("interview=notalevel").expect_err("malformed directive");
        assert!(matches!(
            err,
            TelemetryError::EnvFilter { ref value, .. } if value == "interview=notalevel"
        ));
        assert!(filter("debug").is_ok());
    }
}
