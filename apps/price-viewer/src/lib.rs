#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Price Viewer - Live Candle Stream Client
//!
//! A viewer for a real-time price feed: it holds exactly one live gRPC
//! server-streaming subscription per (symbol, interval) pair against a
//! remote price engine, translates transport events into a typed data/error
//! stream, and exposes the latest candle plus connection state for
//! rendering.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Candle and subscription types with no transport deps
//!   - `candle`: OHLCV aggregate for one time window
//!   - `subscription`: requests, stream events, errors, snapshots
//!
//! - **Application**: Subscription lifecycle use cases and ports
//!   - `ports`: the `CandleSource` interface infrastructure implements
//!   - `subscriber`: opens streams, forwards events, owns cancellation
//!   - `binding`: the Idle/Loading/Live/Failed state machine
//!
//! - **Presentation**: Pure mapping from snapshots to renderable views
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `grpc`: channel holder, `StreamAggregates` source, wire codec
//!   - `config`: endpoint and viewer settings from the environment
//!   - `telemetry`: tracing subscriber setup
//!
//! # Data Flow
//!
//! ```text
//! Price Engine ──► gRPC channel ──► GrpcCandleSource ──► StreamSubscriber
//!                 (ClientHolder)      (decode + map)     (events, cancel)
//!                                                              │
//!                              render(PriceView) ◄── StreamBinding (watch)
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Core candle and subscription types.
pub mod domain;

/// Application layer - Lifecycle use cases and port definitions.
pub mod application;

/// Presentation layer - Pure view mapping.
pub mod presentation;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::{
    Candle, ConnectionState, StreamError, StreamEvent, StreamSnapshot, SubscriptionRequest,
    Symbol,
};

// Application types
pub use application::{
    BindingParams, CandleSource, CandleStream, StreamBinding, StreamSubscriber,
    SubscriptionHandle,
};

// Presentation types
pub use presentation::{ChartPoint, PriceView, QuoteView, render};

// Infrastructure config
pub use infrastructure::config::{ConfigError, ViewerConfig, resolve_endpoint};

// gRPC adapter (and proto stubs, for integration tests)
pub use infrastructure::grpc::{ClientHolder, GrpcCandleSource, proto::price::v1 as proto};
