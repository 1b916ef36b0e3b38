//! Tracing Integration
//!
//! Structured logging via `tracing` with an environment-driven filter.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level directives (default: `price_viewer=info`)
//!
//! # Usage
//!
//! ```ignore
//! use price_viewer::infrastructure::telemetry;
//!
//! // Initialize once at startup.
//! telemetry::init();
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize the tracing subscriber.
///
/// Safe to call once per process; later calls are ignored so tests that
/// race on initialization do not panic.
#[allow(clippy::expect_used)]
pub fn init() {
    let env_filter = EnvFilter::from_default_env().add_directive(
        "price_viewer=info"
            .parse()
            .expect("static directive 'price_viewer=info' is valid"),
    );

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init();
}
