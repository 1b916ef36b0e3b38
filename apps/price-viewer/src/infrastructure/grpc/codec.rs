//! Wire Candle Decoding
//!
//! Converts wire candles (doubles) into domain candles (decimals). The
//! price engine emits IEEE doubles; anything non-finite cannot become a
//! `Decimal` and is rejected as malformed.

use rust_decimal::Decimal;

use crate::domain::{Candle, StreamError};

use super::proto::price::v1 as proto;

/// Decode one wire candle into the domain representation.
///
/// # Errors
///
/// Returns [`StreamError::MalformedCandle`] when any numeric field is not a
/// finite decimal.
pub fn decode_candle(raw: proto::Candle) -> Result<Candle, StreamError> {
    Ok(Candle {
        window_start_ms: raw.window_start_ms,
        open: to_decimal("open", raw.open)?,
        high: to_decimal("high", raw.high)?,
        low: to_decimal("low", raw.low)?,
        close: to_decimal("close", raw.close)?,
        volume: to_decimal("volume", raw.volume)?,
        vwap: to_decimal("vwap", raw.vwap)?,
        symbol: raw.symbol,
    })
}

fn to_decimal(field: &'static str, value: f64) -> Result<Decimal, StreamError> {
    Decimal::try_from(value)
        .map_err(|_| StreamError::MalformedCandle(format!("{field} is not representable: {value}")))
}
