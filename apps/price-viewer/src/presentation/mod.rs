//! Presentation Adapter
//!
//! Pure mapping from an observable [`StreamSnapshot`] to renderable fields.
//! Holds no state of its own: rendering the same snapshot twice yields the
//! same view. The three presentation states are mutually exclusive and
//! checked in order: error takes precedence over loading, loading over data
//! display.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{ConnectionState, StreamSnapshot};

/// A single chart series entry, keyed by the candle's window open time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    /// Window open time, epoch milliseconds.
    pub time_ms: i64,
    /// Price plotted at this point (the candle close).
    pub price: Decimal,
}

/// Renderable quote fields for the latest candle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteView {
    /// Symbol being displayed.
    pub symbol: String,
    /// Latest price (candle close).
    pub last_price: Decimal,
    /// Volume of the current window.
    pub volume: Decimal,
    /// Volume-weighted average price of the current window.
    pub vwap: Decimal,
    /// Chart series entry for the current window.
    pub point: ChartPoint,
    /// Window open time, when representable.
    pub window_start: Option<DateTime<Utc>>,
    /// Connection status label ("connected" / "disconnected" / ...).
    pub status: &'static str,
}

/// What the renderer should draw for a given snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum PriceView {
    /// An error panel in place of the chart.
    ErrorPanel {
        /// Human-readable failure description.
        message: String,
    },
    /// A placeholder while the stream connects.
    Connecting,
    /// The latest quote and chart point.
    Quote(QuoteView),
    /// Nothing to show (binding disabled or not yet started).
    Idle,
}

/// Map a snapshot to its view.
#[must_use]
pub fn render(snapshot: &StreamSnapshot) -> PriceView {
    if let Some(error) = &snapshot.error {
        return PriceView::ErrorPanel {
            message: error.to_string(),
        };
    }
    if snapshot.is_loading {
        return PriceView::Connecting;
    }
    match &snapshot.data {
        Some(candle) => PriceView::Quote(QuoteView {
            symbol: candle.symbol.clone(),
            last_price: candle.close,
            volume: candle.volume,
            vwap: candle.vwap,
            point: ChartPoint {
                time_ms: candle.window_start_ms,
                price: candle.close,
            },
            window_start: candle.window_start(),
            status: snapshot.connection_state().as_str(),
        }),
        None => PriceView::Idle,
    }
}

impl QuoteView {
    /// Price formatted for display, e.g. `$50000.12`.
    #[must_use]
    pub fn price_label(&self) -> String {
        format!("${}", self.last_price.round_dp(2))
    }
}
