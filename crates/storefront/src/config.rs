//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `LOCALAZY_HOST` - Bind address (default: 127.0.0.1)
//! - `LOCALAZY_PORT` - Listen port (default: 3000)
//! - `LOCALAZY_BASE_URL` - Public URL (default: <http://localhost:3000>)
//! - `LOCALAZY_CONTENT_DIR` - Markdown pages and catalog (default: crates/storefront/content)
//! - `LOCALAZY_DELIVERY_FEE` - Flat delivery fee in rupees (default: 40)
//! - `LOCALAZY_PAYMENT_DELAY_MS` - Simulated payment processing (default: 2000)
//! - `LOCALAZY_ACCEPT_DELAY_MS` - Simulated courier accept round trip (default: 1500)
//! - `LOCALAZY_DETECT_DELAY_MS` - Simulated geolocation lookup (default: 2000)
//! - `LOCALAZY_SETUP_DELAY_MS` - Simulated profile upload (default: 1500)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0 to 1.0 (default: 0.0)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use localazy_core::Price;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Artificial latencies that make the demo feel like it talks to a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedDelays {
    pub payment: Duration,
    pub courier_accept: Duration,
    pub detect_location: Duration,
    pub profile_setup: Duration,
}

impl SimulatedDelays {
    /// No waiting at all. Used by tests.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            payment: Duration::ZERO,
            courier_accept: Duration::ZERO,
            detect_location: Duration::ZERO,
            profile_setup: Duration::ZERO,
        }
    }
}

impl Default for SimulatedDelays {
    fn default() -> Self {
        Self {
            payment: Duration::from_millis(2000),
            courier_accept: Duration::from_millis(1500),
            detect_location: Duration::from_millis(2000),
            profile_setup: Duration::from_millis(1500),
        }
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Directory holding `pages/*.md` and `catalog.json`
    pub content_dir: PathBuf,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Flat fee added to every non-empty checkout
    pub delivery_fee: Price,
    pub delays: SimulatedDelays,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            content_dir: PathBuf::from("crates/storefront/content"),
            static_dir: PathBuf::from("crates/storefront/static"),
            delivery_fee: Price::rupees(40),
            delays: SimulatedDelays::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("LOCALAZY_HOST", "127.0.0.1")?;
        let port = parse_env("LOCALAZY_PORT", "3000")?;
        let base_url = get_env_or_default("LOCALAZY_BASE_URL", "http://localhost:3000");
        parse_value::<Url>("LOCALAZY_BASE_URL", &base_url)?;
        let content_dir = PathBuf::from(get_env_or_default(
            "LOCALAZY_CONTENT_DIR",
            "crates/storefront/content",
        ));
        let static_dir = PathBuf::from(get_env_or_default(
            "LOCALAZY_STATIC_DIR",
            "crates/storefront/static",
        ));

        let delivery_fee: Price = parse_env("LOCALAZY_DELIVERY_FEE", "40")?;
        if delivery_fee.amount().is_sign_negative() {
            return Err(ConfigError::InvalidEnvVar(
                "LOCALAZY_DELIVERY_FEE".to_string(),
                "must not be negative".to_string(),
            ));
        }

        let delays = SimulatedDelays {
            payment: parse_millis("LOCALAZY_PAYMENT_DELAY_MS", 2000)?,
            courier_accept: parse_millis("LOCALAZY_ACCEPT_DELAY_MS", 1500)?,
            detect_location: parse_millis("LOCALAZY_DETECT_DELAY_MS", 2000)?,
            profile_setup: parse_millis("LOCALAZY_SETUP_DELAY_MS", 1500)?,
        };

        Ok(Self {
            host,
            port,
            base_url,
            content_dir,
            static_dir,
            delivery_fee,
            delays,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_rate("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_rate("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_millis(key: &str, default: u64) -> Result<Duration, ConfigError> {
    parse_env::<u64>(key, &default.to_string()).map(Duration::from_millis)
}

/// Parse a sample rate in `0.0..=1.0`.
fn parse_rate(key: &str, default: &str) -> Result<f32, ConfigError> {
    let rate: f32 = parse_env(key, default)?;
    check_rate(key, rate)
}

fn check_rate(key: &str, rate: f32) -> Result<f32, ConfigError> {
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("{rate} is outside 0.0..=1.0"),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            port: 8080,
            ..StorefrontConfig::default()
        };
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_default_is_not_secure() {
        let mut config = StorefrontConfig::default();
        assert!(!config.is_secure());
        config.base_url = "https://localazy.example".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn test_parse_value_reports_key() {
        let err = parse_value::<u16>("LOCALAZY_PORT", "70000").unwrap_err();
        assert!(err.to_string().contains("LOCALAZY_PORT"));

        let fee: Price = parse_value("LOCALAZY_DELIVERY_FEE", " 25.50 ").unwrap();
        assert_eq!(fee, Price::from_paise(2550));
    }

    #[test]
    fn test_check_rate_bounds() {
        assert!(check_rate("SENTRY_SAMPLE_RATE", 0.5).is_ok());
        assert!(check_rate("SENTRY_SAMPLE_RATE", 1.0).is_ok());
        assert!(check_rate("SENTRY_SAMPLE_RATE", 1.5).is_err());
        assert!(check_rate("SENTRY_SAMPLE_RATE", -0.1).is_err());
    }

    #[test]
    fn test_simulated_delays_none() {
        let delays = SimulatedDelays::none();
        assert_eq!(delays.payment, Duration::ZERO);
        assert_ne!(SimulatedDelays::default(), delays);
    }
}
