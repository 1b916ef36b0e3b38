//! Subscription Domain Types
//!
//! Types describing one logical live subscription to a symbol/interval pair:
//! the request identifying it, the tagged events flowing out of it, the
//! errors that terminate it, and the observable snapshot derived from them.
//!
//! # Design
//!
//! A subscription's identity is the `(symbol, interval_ms)` pair; changing
//! either value invalidates the existing subscription. Exactly one of
//! `Data` / `Error` flows to the consumer per transport emission, and the
//! connection state is derived from the snapshot rather than transmitted.

use serde::Serialize;
use thiserror::Error;

use super::candle::{Candle, Symbol};

// =============================================================================
// Subscription Request
// =============================================================================

/// Identifies one live stream subscription.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionRequest {
    /// Symbol to subscribe to.
    pub symbol: Symbol,
    /// Aggregation window size in milliseconds. Must be positive.
    pub interval_ms: i32,
}

impl SubscriptionRequest {
    /// Create a new subscription request.
    #[must_use]
    pub fn new(symbol: impl Into<Symbol>, interval_ms: i32) -> Self {
        Self {
            symbol: symbol.into(),
            interval_ms,
        }
    }

    /// Whether this request may open a stream.
    ///
    /// Invalid requests (empty symbol, non-positive interval) are prevented
    /// proactively by the lifecycle binding; they are never reported as an
    /// error state.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.symbol.is_empty() && self.interval_ms > 0
    }
}

// =============================================================================
// Stream Errors
// =============================================================================

/// A failure surfaced on the stream event path.
///
/// All recoverable failures terminate at the lifecycle binding and become
/// the `error` field of [`StreamSnapshot`]; nothing is thrown synchronously
/// to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum StreamError {
    /// The stream failed to open or was terminated abnormally by the remote
    /// side or the network.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The configured endpoint URL could not be turned into a channel.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// A received candle carried values the domain cannot represent.
    #[error("malformed candle: {0}")]
    MalformedCandle(String),
}

// =============================================================================
// Stream Events
// =============================================================================

/// A discrete unit pushed from transport to consumer.
///
/// Exactly one variant flows per transport-level emission; an error event
/// never also carries data.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A new candle superseding the previous one.
    Data(Candle),
    /// A terminal stream failure.
    Error(StreamError),
}

// =============================================================================
// Connection State
// =============================================================================

/// Derived connection state, never transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConnectionState {
    /// Subscription opened, no data received yet.
    Connecting,
    /// At least one candle has arrived.
    Connected,
    /// No live subscription, or the last one failed.
    Disconnected,
}

impl ConnectionState {
    /// Human-readable status label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }
}

// =============================================================================
// Observable Snapshot
// =============================================================================

/// The state a lifecycle binding exposes to its observers.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StreamSnapshot {
    /// Latest candle, replaced wholesale on every `Data` event.
    pub data: Option<Candle>,
    /// Terminal error of the current subscription, if any.
    pub error: Option<StreamError>,
    /// True from subscription open until the first event arrives.
    pub is_loading: bool,
    /// True once data has arrived and no error has occurred since.
    pub is_connected: bool,
}

impl StreamSnapshot {
    /// Snapshot for the idle state (disabled or invalid parameters).
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            data: None,
            error: None,
            is_loading: false,
            is_connected: false,
        }
    }

    /// Snapshot for a freshly opened subscription.
    #[must_use]
    pub const fn loading() -> Self {
        Self {
            data: None,
            error: None,
            is_loading: true,
            is_connected: false,
        }
    }

    /// Derive the connection state.
    ///
    /// Starts `Connecting` on subscribe, becomes `Connected` on the first
    /// `Data` event and `Disconnected` on any error or teardown.
    #[must_use]
    pub const fn connection_state(&self) -> ConnectionState {
        if self.is_connected {
            ConnectionState::Connected
        } else if self.is_loading {
            ConnectionState::Connecting
        } else {
            ConnectionState::Disconnected
        }
    }
}
