//! Port Interfaces
//!
//! Defines the interfaces (ports) for external systems following the
//! Hexagonal Architecture pattern. These are the contracts that
//! infrastructure adapters must implement.
//!
//! ## Driven Ports (Outbound)
//!
//! - [`CandleSource`]: opens a live candle stream for one subscription
//!   request. The gRPC adapter implements it against the price engine;
//!   tests substitute scripted or mocked sources.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::domain::{Candle, StreamError, SubscriptionRequest};

/// A lazy, non-restartable sequence of candles for one subscription.
///
/// The stream ends on cancellation, on a terminal error item, or when the
/// remote side completes the call. Items arrive in transport delivery order;
/// no buffering, batching, or reordering happens anywhere in this crate.
pub type CandleStream = BoxStream<'static, Result<Candle, StreamError>>;

/// Source of live candle streams.
///
/// `open` performs the stream setup; failures during setup are returned as
/// an error so the caller can funnel them into the single event path that
/// consumers observe.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Open a server-streaming subscription for `request`.
    ///
    /// # Errors
    ///
    /// Returns a [`StreamError`] when the stream cannot be opened, e.g. a
    /// malformed endpoint or an immediate transport rejection.
    async fn open(&self, request: &SubscriptionRequest) -> Result<CandleStream, StreamError>;
}
