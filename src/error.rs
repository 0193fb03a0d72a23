use thiserror::Error;

/// Rejected inputs for the validated scoring entry points.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("time budget must be positive, got {max_seconds}s")]
    NonPositiveBudget { max_seconds: f64 },

    #[error("elapsed time cannot be negative, got {actual_seconds}s")]
    NegativeElapsed { actual_seconds: f64 },

    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DATABASE_URL must be set to a Postgres instance")]
    MissingDatabaseUrl,

    #[error("{name} must be a valid {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("INTERVIEW_MAX_SECONDS must be positive, got {0}")]
    NonPositiveBudget(f64),
}

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}': unable to build EnvFilter")]
    EnvFilter {
        value: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("telemetry error: {0}")]
    Subscriber(#[source] Box<dyn std::error::Error + Send + Sync>),
}
