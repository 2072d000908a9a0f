//! Service configuration loaded from environment variables

use std::time::Duration;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// HTTP port for the API, metrics and health endpoints
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub migrations_path: String,
    pub authorizer_url: String,
    pub payment_url: String,
    /// Timeout applied to every outbound HTTP call
    pub default_timeout: Duration,
    pub kafka: KafkaConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KafkaConfig {
    pub brokers: String,
    pub consumer_group: String,
    pub paid_topic: String,
    pub ready_topic: String,
    pub production_topic: String,
}

impl AppConfig {
    /// Load `.env` when present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env { lookup };

        Ok(Self {
            port: env.parse_or("PORT", 8080)?,
            database_url: env.database_url()?,
            database_max_connections: env.parse_or("DATABASE_MAX_CONNECTIONS", 10)?,
            migrations_path: env.or("MIGRATIONS_PATH", "./migrations"),
            authorizer_url: env.require("AUTHORIZER_URL")?,
            payment_url: env.require("PAYMENT_URL")?,
            default_timeout: match env.get("DEFAULT_TIMEOUT") {
                Some(value) => parse_duration(&value).ok_or(ConfigError::Invalid {
                    name: "DEFAULT_TIMEOUT",
                    value,
                })?,
                None => Duration::from_secs(5),
            },
            kafka: KafkaConfig {
                brokers: env.or("KAFKA_BROKERS", "127.0.0.1:9092"),
                consumer_group: env.or("KAFKA_CONSUMER_GROUP", "order-service"),
                paid_topic: env.or("ORDER_EVENTS_PAID_TOPIC", "orders-paid"),
                ready_topic: env.or("ORDER_EVENTS_READY_TOPIC", "orders-ready"),
                production_topic: env.or("ORDER_PRODUCTION_TOPIC", "orders-production"),
            },
        })
    }
}

struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Empty values count as unset.
    fn get(&self, name: &str) -> Option<String> {
        (self.lookup)(name).filter(|v| !v.trim().is_empty())
    }

    fn require(&self, name: &'static str) -> Result<String, ConfigError> {
        self.get(name).ok_or(ConfigError::Missing(name))
    }

    fn or(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or_else(|| default.to_string())
    }

    fn parse_or<T: std::str::FromStr>(&self, name: &'static str, default: T) -> Result<T, ConfigError> {
        match self.get(name) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { name, value }),
            None => Ok(default),
        }
    }

    /// `DATABASE_URL` wins; otherwise the URL is composed from the POSTGRES_* parts.
    fn database_url(&self) -> Result<String, ConfigError> {
        if let Some(url) = self.get("DATABASE_URL") {
            return Ok(url);
        }

        let host = self.require("POSTGRES_HOST")?;
        let port: u16 = self.parse_or("POSTGRES_PORT", 5432)?;
        let db = self.require("POSTGRES_DB")?;
        let user = self.require("POSTGRES_USER")?;
        let password = self.require("POSTGRES_PASSWORD")?;
        let sslmode = self.or("POSTGRES_SSLMODE", "disable");

        Ok(format!("postgres://{user}:{password}@{host}:{port}/{db}?sslmode={sslmode}"))
    }
}

/// Parses durations such as `500ms`, `5s`, `1m30s` or `1.5h`.
pub fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if value == "0" {
        return Some(Duration::ZERO);
    }

    let mut rest = value;
    let mut total_nanos = 0f64;

    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let number: f64 = rest[..number_len].parse().ok()?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let nanos_per_unit = match &rest[..unit_len] {
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            _ => return None,
        };
        rest = &rest[unit_len..];

        total_nanos += number * nanos_per_unit;
    }

    (total_nanos.is_finite() && total_nanos <= u64::MAX as f64).then(|| Duration::from_nanos(total_nanos as u64))
}
