//! Transport Client Holder
//!
//! Owns the single gRPC channel shared by every subscription against one
//! price engine endpoint. The channel is constructed lazily and establishes
//! no network connection by itself; connecting happens when the first
//! stream is opened. There is no shutdown operation, the channel lives for
//! the duration of the process.

use std::sync::OnceLock;

use tonic::transport::{Channel, Endpoint};

use crate::domain::StreamError;
use crate::infrastructure::config::resolve_endpoint;

use super::proto::price::v1::price_stream_client::PriceStreamClient;

/// Holds one lazily constructed channel for a fixed endpoint.
///
/// Explicitly owned and injectable: construct it once at startup and share
/// it by reference with whatever opens streams. All subscriptions for the
/// endpoint share the channel, but no subscription owns it.
#[derive(Debug)]
pub struct ClientHolder {
    default_url: String,
    channel: OnceLock<Channel>,
}

impl ClientHolder {
    /// Create a holder for the given endpoint URL.
    #[must_use]
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            default_url: endpoint_url.into(),
            channel: OnceLock::new(),
        }
    }

    /// Create a holder from the configured endpoint
    /// (`PRICE_ENGINE_URL` or the hardcoded fallback).
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(resolve_endpoint(None))
    }

    /// Get a client over the shared channel.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InvalidEndpoint`] when the URL cannot be
    /// parsed into a channel endpoint.
    pub fn client(&self) -> Result<PriceStreamClient<Channel>, StreamError> {
        self.client_for(None)
    }

    /// Get a client, optionally overriding the endpoint URL.
    ///
    /// The URL is effectively fixed after first use: the override applies
    /// only when the channel has not been constructed yet, and subsequent
    /// calls return the cached channel regardless of the argument. This
    /// mirrors the upstream engine clients and is a documented limitation,
    /// not re-parameterizable per call.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InvalidEndpoint`] when the URL cannot be
    /// parsed into a channel endpoint.
    pub fn client_for(&self, url: Option<&str>) -> Result<PriceStreamClient<Channel>, StreamError> {
        if let Some(channel) = self.channel.get() {
            return Ok(PriceStreamClient::new(channel.clone()));
        }

        let url = url.unwrap_or(&self.default_url);
        let endpoint = Endpoint::from_shared(url.to_string())
            .map_err(|e| StreamError::InvalidEndpoint(format!("{url}: {e}")))?;

        tracing::debug!(endpoint = %url, "Constructing price engine channel");
        let channel = self.channel.get_or_init(|| endpoint.connect_lazy()).clone();
        Ok(PriceStreamClient::new(channel))
    }
}
