//! gRPC Candle Source
//!
//! Implements the [`CandleSource`] port over the shared channel: one
//! `StreamAggregates` call per subscription, decoded into domain candles.
//! Setup failures and mid-stream transport failures both surface as
//! [`StreamError`] values so callers observe all failure through the one
//! event path.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use tonic::{Request, Status};

use crate::application::ports::{CandleSource, CandleStream};
use crate::domain::{StreamError, SubscriptionRequest};

use super::client::ClientHolder;
use super::codec::decode_candle;
use super::proto::price::v1 as proto;

impl From<Status> for StreamError {
    fn from(status: Status) -> Self {
        let message = status.message();
        if message.is_empty() {
            Self::Transport(status.code().to_string())
        } else {
            Self::Transport(message.to_string())
        }
    }
}

/// Candle source backed by the price engine's streaming RPC.
pub struct GrpcCandleSource {
    holder: Arc<ClientHolder>,
}

impl GrpcCandleSource {
    /// Create a source over the shared client holder.
    #[must_use]
    pub fn new(holder: Arc<ClientHolder>) -> Self {
        Self { holder }
    }
}

#[async_trait]
impl CandleSource for GrpcCandleSource {
    async fn open(&self, request: &SubscriptionRequest) -> Result<CandleStream, StreamError> {
        let mut client = self.holder.client()?;

        let subscribe = proto::SubscribeRequest {
            symbol: request.symbol.clone(),
            interval_ms: request.interval_ms,
        };

        tracing::debug!(
            symbol = %request.symbol,
            interval_ms = request.interval_ms,
            "Opening StreamAggregates call"
        );

        let inbound = client
            .stream_aggregates(Request::new(subscribe))
            .await
            .map_err(StreamError::from)?
            .into_inner();

        let stream = inbound.map(|item| match item {
            Ok(raw) => decode_candle(raw),
            Err(status) => Err(StreamError::from(status)),
        });

        Ok(stream.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_message_becomes_transport_error() {
        let error = StreamError::from(Status::internal("stream closed"));
        assert_eq!(error, StreamError::Transport("stream closed".to_string()));
    }

    #[test]
    fn empty_status_message_falls_back_to_code() {
        let error = StreamError::from(Status::unavailable(""));
        assert!(matches!(error, StreamError::Transport(code) if !code.is_empty()));
    }
}
