//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable, multi-line output.
    Pretty,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => Err(AppError::Config(format!(
                "LOG_FORMAT must be `json` or `pretty`, got `{other}`"
            ))),
        }
    }
}

/// Runtime configuration of the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// PostgreSQL URL; `None` runs on the in-memory event log.
    pub database_url: Option<String>,
    /// Upper bound of the connection pool.
    pub database_max_connections: u32,
    /// Requests still running after this long are cancelled.
    pub request_timeout: Duration,
    /// Log output format.
    pub log_format: LogFormat,
    /// OTLP endpoint for span export, if any.
    pub otlp_endpoint: Option<String>,
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{name} is invalid: {e}"))),
        None => Ok(default),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = non_empty(lookup("HOST")).unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let database_max_connections =
            parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        if database_max_connections == 0 {
            return Err(AppError::Config(
                "DATABASE_MAX_CONNECTIONS must be at least 1".into(),
            ));
        }
        let timeout_secs = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(AppError::Config(
                "REQUEST_TIMEOUT_SECS must be at least 1".into(),
            ));
        }
        let log_format = match non_empty(lookup("LOG_FORMAT")) {
            Some(raw) => raw.trim().parse()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            host,
            port,
            database_url: non_empty(lookup("DATABASE_URL")),
            database_max_connections,
            request_timeout: Duration::from_secs(timeout_secs),
            log_format,
            otlp_endpoint: non_empty(lookup("OTEL_EXPORTER_OTLP_ENDPOINT")),
        })
    }

    /// The socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `host` and `port` do not form a valid
    /// socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_select_in_memory_log() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.database_url, None);
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.otlp_endpoint, None);
    }

    #[test]
    fn test_reads_every_variable() {
        let config = config_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("DATABASE_URL", "postgres://localhost/pricing"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("LOG_FORMAT", "Pretty"),
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://localhost:4317"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:8080");
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/pricing")
        );
        assert_eq!(config.database_max_connections, 4);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(
            config.otlp_endpoint.as_deref(),
            Some("http://localhost:4317")
        );
    }

    #[test]
    fn test_blank_database_url_is_unset() {
        let config = config_from(&[("DATABASE_URL", "  ")]).unwrap();

        assert_eq!(config.database_url, None);
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let result = config_from(&[("PORT", "eighty")]);

        match result {
            Err(AppError::Config(msg)) => assert!(msg.contains("PORT")),
            other => panic!("expected Config, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_timeout_is_config_error() {
        let result = config_from(&[("REQUEST_TIMEOUT_SECS", "0")]);

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_unknown_log_format_is_config_error() {
        let result = config_from(&[("LOG_FORMAT", "xml")]);

        match result {
            Err(AppError::Config(msg)) => assert!(msg.contains("LOG_FORMAT")),
            other => panic!("expected Config, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_host_fails_at_bind_addr() {
        let config = config_from(&[("HOST", "not a host")]).unwrap();

        assert!(matches!(config.bind_addr(), Err(AppError::Config(_))));
    }
}
