//! Candle Domain Type
//!
//! One OHLCV aggregation record for a fixed time window, as received from
//! the price engine stream. Candles are immutable once received; each new
//! candle supersedes the prior one for display purposes, so no history is
//! retained anywhere in this crate.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// A symbol string (e.g. "BTCUSDT").
pub type Symbol = String;

/// One OHLCV aggregate for a fixed time window.
///
/// Prices and volume use [`Decimal`] rather than the wire doubles; the
/// infrastructure layer performs the conversion and rejects non-finite
/// values before a candle ever reaches the domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candle {
    /// Symbol this candle aggregates.
    pub symbol: Symbol,
    /// Window open time, epoch milliseconds.
    pub window_start_ms: i64,
    /// Opening price of the window.
    pub open: Decimal,
    /// Highest price of the window.
    pub high: Decimal,
    /// Lowest price of the window.
    pub low: Decimal,
    /// Closing price of the window (latest price for display).
    pub close: Decimal,
    /// Total traded volume within the window.
    pub volume: Decimal,
    /// Volume-weighted average price within the window.
    pub vwap: Decimal,
}

impl Candle {
    /// Window open time as a UTC timestamp.
    ///
    /// Returns `None` when `window_start_ms` is outside the representable
    /// range of [`DateTime`].
    #[must_use]
    pub fn window_start(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.window_start_ms).single()
    }
}
