use std::env;

use uuid::Uuid;

use crate::error::ConfigError;

const DEFAULT_MAX_SECONDS: f64 = 600.0;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
    /// Default company scope for fetches; the CLI flag wins over it.
    pub company_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug, Clone, Copy)]
pub struct ScoringConfig {
    /// Time budget used for time-efficiency.
    pub max_seconds: f64,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let url = env::var("DATABASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)?;

        let max_connections = parse_var("DATABASE_MAX_CONNECTIONS", "u32", 5u32)?;
        let max_seconds = parse_var("INTERVIEW_MAX_SECONDS", "number", DEFAULT_MAX_SECONDS)?;
        if max_seconds.is_nan() || max_seconds <= 0.0 {
            return Err(ConfigError::NonPositiveBudget(max_seconds));
        }

        let company_id = match env::var("INTERVIEW_COMPANY_ID") {
            Ok(value) if !value.trim().is_empty() => {
                Some(value.trim().parse::<Uuid>().map_err(|_| ConfigError::Invalid {
                    name: "INTERVIEW_COMPANY_ID",
                    expected: "UUID",
                    value,
                })?)
            }
            _ => None,
        };

        let log_level = env::var("INTERVIEW_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            database: DatabaseConfig {
                url,
                max_connections,
            },
            telemetry: TelemetryConfig { log_level },
            scoring: ScoringConfig { max_seconds },
            company_id,
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    name: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
        Err(_) => Ok(default),
    }
}
