//! Viewer Configuration
//!
//! Configuration types for the viewer, loaded from environment variables.
//!
//! The endpoint URL resolves with recognized precedence: explicit argument >
//! `PRICE_ENGINE_URL` environment variable > hardcoded fallback.

use thiserror::Error;

/// Fallback endpoint when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080";

/// Default symbol to watch.
const DEFAULT_SYMBOL: &str = "BTCUSDT";

/// Default aggregation window in milliseconds.
const DEFAULT_INTERVAL_MS: i32 = 1000;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held a value that does not parse.
    #[error("invalid value for {name}: {value}")]
    InvalidValue {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Complete viewer configuration.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Price engine gRPC endpoint URL.
    pub endpoint_url: String,
    /// Symbol to subscribe to.
    pub symbol: String,
    /// Aggregation window size in milliseconds.
    pub interval_ms: i32,
}

impl ViewerConfig {
    /// Create configuration from environment variables.
    ///
    /// Recognized variables: `PRICE_ENGINE_URL`, `PRICE_SYMBOL`,
    /// `PRICE_INTERVAL_MS`.
    ///
    /// # Errors
    ///
    /// Returns an error when `PRICE_INTERVAL_MS` is present but not a
    /// positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint_url = resolve_endpoint(None);

        let symbol =
            std::env::var("PRICE_SYMBOL").unwrap_or_else(|_| DEFAULT_SYMBOL.to_string());

        let interval_ms = match std::env::var("PRICE_INTERVAL_MS") {
            Ok(raw) => raw
                .parse::<i32>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or(ConfigError::InvalidValue {
                    name: "PRICE_INTERVAL_MS",
                    value: raw,
                })?,
            Err(_) => DEFAULT_INTERVAL_MS,
        };

        Ok(Self {
            endpoint_url,
            symbol,
            interval_ms,
        })
    }
}

/// Resolve the endpoint URL: explicit argument > environment > fallback.
#[must_use]
pub fn resolve_endpoint(explicit: Option<&str>) -> String {
    resolve_endpoint_from(explicit, std::env::var("PRICE_ENGINE_URL").ok())
}

/// Precedence logic, separated from the environment for testing.
fn resolve_endpoint_from(explicit: Option<&str>, env_value: Option<String>) -> String {
    explicit.map_or_else(
        || env_value.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        str::to_string,
    )
}
