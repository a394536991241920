//! Basket configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BASKET_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `BASKET_BASE_URL` - Public URL of the site (e.g. `https://basket.example.com`)
//!
//! ## Optional
//! - `BASKET_HOST` - Bind address (default: 127.0.0.1)
//! - `BASKET_PORT` - Listen port (default: 3000)
//! - `BASKET_ADMIN_EMAIL` - Account allowed to use the `/admin` pages
//! - `BASKET_IMPORT_MAX_BYTES` - Largest accepted history import (default: 5 MiB)
//! - `BASKET_TRUST_PROXY_HEADERS` - `true` behind a reverse proxy that sets
//!   `X-Forwarded-For` (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};

use basket_core::Email;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_IMPORT_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Basket application configuration.
#[derive(Clone)]
pub struct BasketConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL
    pub base_url: Url,
    /// Account with access to the admin pages
    pub admin_email: Option<Email>,
    /// Largest history import body accepted, in bytes
    pub import_max_bytes: usize,
    /// Key rate limits on proxy headers instead of the peer address
    pub trust_proxy_headers: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

impl std::fmt::Debug for BasketConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasketConfig")
            .field("database_url", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_url", &self.base_url.as_str())
            .field("admin_email", &self.admin_email)
            .field("import_max_bytes", &self.import_max_bytes)
            .field("trust_proxy_headers", &self.trust_proxy_headers)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .finish_non_exhaustive()
    }
}

impl BasketConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// `from_env` passes the process environment; tests pass a map.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("BASKET_DATABASE_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar("BASKET_DATABASE_URL".to_owned()))?;

        let host = parse_or_default(&lookup, "BASKET_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = parse_or_default(&lookup, "BASKET_PORT", 3000_u16)?;

        let base_url = lookup("BASKET_BASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("BASKET_BASE_URL".to_owned()))?;
        let base_url = Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("BASKET_BASE_URL".to_owned(), e.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "BASKET_BASE_URL".to_owned(),
                "scheme must be http or https".to_owned(),
            ));
        }

        let admin_email = lookup("BASKET_ADMIN_EMAIL")
            .filter(|v| !v.trim().is_empty())
            .map(|v| Email::parse(&v))
            .transpose()
            .map_err(|e| ConfigError::InvalidEnvVar("BASKET_ADMIN_EMAIL".to_owned(), e.to_string()))?;

        let import_max_bytes =
            parse_or_default(&lookup, "BASKET_IMPORT_MAX_BYTES", DEFAULT_IMPORT_MAX_BYTES)?;

        let trust_proxy_headers =
            parse_or_default(&lookup, "BASKET_TRUST_PROXY_HEADERS", false)?;

        let sentry_sample_rate = parse_or_default(&lookup, "SENTRY_SAMPLE_RATE", 1.0_f32)?;
        let sentry_traces_sample_rate =
            parse_or_default(&lookup, "SENTRY_TRACES_SAMPLE_RATE", 0.0_f32)?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            admin_email,
            import_max_bytes,
            trust_proxy_headers,
            sentry_dsn: lookup("SENTRY_DSN").filter(|v| !v.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the site is served over HTTPS (controls the `Secure` cookie flag).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.scheme() == "https"
    }

    /// Whether `email` belongs to the configured admin account.
    #[must_use]
    pub fn is_admin(&self, email: &Email) -> bool {
        self.admin_email.as_ref() == Some(email)
    }
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string())),
        _ => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<BasketConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        BasketConfig::from_lookup(|key| map.get(key).cloned())
    }

    const MINIMAL: &[(&str, &str)] = &[
        ("BASKET_DATABASE_URL", "postgres://basket:pw@localhost/basket"),
        ("BASKET_BASE_URL", "http://localhost:3000"),
    ];

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = load(MINIMAL).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.import_max_bytes, DEFAULT_IMPORT_MAX_BYTES);
        assert!(config.admin_email.is_none());
        assert!(!config.trust_proxy_headers);
        assert!(!config.is_secure());
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_database_url_falls_back_to_generic_var() {
        let config = load(&[
            ("DATABASE_URL", "postgres://fallback/db"),
            ("BASKET_BASE_URL", "https://basket.example.com"),
        ])
        .unwrap();
        assert_eq!(config.database_url.expose_secret(), "postgres://fallback/db");
        assert!(config.is_secure());
    }

    #[test]
    fn test_missing_base_url() {
        let err = load(&[("BASKET_DATABASE_URL", "postgres://x/y")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "BASKET_BASE_URL"));
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let err = load(&[
            ("BASKET_DATABASE_URL", "postgres://x/y"),
            ("BASKET_BASE_URL", "ftp://files.example.com"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(..)));
    }

    #[test]
    fn test_invalid_port() {
        let mut vars = MINIMAL.to_vec();
        vars.push(("BASKET_PORT", "eighty"));
        assert!(matches!(
            load(&vars).unwrap_err(),
            ConfigError::InvalidEnvVar(ref k, _) if k == "BASKET_PORT"
        ));
    }

    #[test]
    fn test_trust_proxy_headers_flag() {
        let mut vars = MINIMAL.to_vec();
        vars.push(("BASKET_TRUST_PROXY_HEADERS", "true"));
        assert!(load(&vars).unwrap().trust_proxy_headers);

        vars.pop();
        vars.push(("BASKET_TRUST_PROXY_HEADERS", "sometimes"));
        assert!(matches!(
            load(&vars).unwrap_err(),
            ConfigError::InvalidEnvVar(ref k, _) if k == "BASKET_TRUST_PROXY_HEADERS"
        ));
    }

    #[test]
    fn test_admin_email_is_normalized() {
        let mut vars = MINIMAL.to_vec();
        vars.push(("BASKET_ADMIN_EMAIL", " Admin@Example.com "));
        let config = load(&vars).unwrap();
        assert!(config.is_admin(&Email::parse("admin@example.com").unwrap()));
        assert!(!config.is_admin(&Email::parse("someone@example.com").unwrap()));
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = load(MINIMAL).unwrap();
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("pw@localhost"));
    }
}
