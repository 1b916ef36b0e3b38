//! Stream Subscriber
//!
//! Owns the translation from an opened candle stream to consumer callbacks.
//! `subscribe` returns immediately with a cancellation handle; events arrive
//! later on a forwarding task, one [`StreamEvent`] per transport emission,
//! in arrival order.
//!
//! # Cancellation
//!
//! Cancellation is cooperative and best-effort: the handle signals a
//! [`CancellationToken`] that the forwarding task races against the stream.
//! Calling `cancel` more than once, or after the stream has already ended,
//! is a no-op and never re-invokes the event callback. A message already
//! dispatched to the callback when cancellation is requested may still be
//! delivered; the lifecycle binding drops such late events with its
//! generation check.

use std::sync::Arc;

use futures::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::domain::{StreamEvent, SubscriptionRequest};

use super::ports::CandleSource;

// =============================================================================
// Subscription Handle
// =============================================================================

/// Cancellation capability for one live subscription.
///
/// Exclusively owned by whoever opened the subscription; ownership never
/// transfers. Dropping the handle does not cancel the stream, cancellation
/// is always an explicit request.
#[derive(Debug)]
pub struct SubscriptionHandle {
    token: CancellationToken,
}

impl SubscriptionHandle {
    /// Request cancellation of the underlying stream. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

// =============================================================================
// Stream Subscriber
// =============================================================================

/// Opens subscriptions against a [`CandleSource`] and forwards their events.
///
/// No retry or reconnection is performed; a terminal error ends the
/// subscription permanently until a new `subscribe` call is made.
pub struct StreamSubscriber {
    source: Arc<dyn CandleSource>,
}

impl StreamSubscriber {
    /// Create a subscriber over the given candle source.
    #[must_use]
    pub fn new(source: Arc<dyn CandleSource>) -> Self {
        Self { source }
    }

    /// Open a live stream for `request`, forwarding each event to `on_event`.
    ///
    /// Returns immediately; stream setup and delivery happen on a spawned
    /// task. Setup failures are reported through the same `Error` event path
    /// as mid-stream failures, so callers observe all failure in one place.
    pub fn subscribe<F>(&self, request: SubscriptionRequest, on_event: F) -> SubscriptionHandle
    where
        F: Fn(StreamEvent) + Send + Sync + 'static,
    {
        let token = CancellationToken::new();
        let task_token = token.clone();
        let source = Arc::clone(&self.source);

        tokio::spawn(async move {
            forward_events(source, request, on_event, task_token).await;
        });

        SubscriptionHandle { token }
    }
}

/// Drive one subscription from open to termination.
async fn forward_events<F>(
    source: Arc<dyn CandleSource>,
    request: SubscriptionRequest,
    on_event: F,
    token: CancellationToken,
) where
    F: Fn(StreamEvent) + Send + Sync + 'static,
{
    let mut stream = tokio::select! {
        () = token.cancelled() => return,
        opened = source.open(&request) => match opened {
            Ok(stream) => stream,
            Err(error) => {
                tracing::warn!(
                    symbol = %request.symbol,
                    interval_ms = request.interval_ms,
                    error = %error,
                    "Stream setup failed"
                );
                if !token.is_cancelled() {
                    on_event(StreamEvent::Error(error));
                }
                return;
            }
        },
    };

    tracing::debug!(
        symbol = %request.symbol,
        interval_ms = request.interval_ms,
        "Stream opened"
    );

    loop {
        tokio::select! {
            () = token.cancelled() => {
                tracing::debug!(symbol = %request.symbol, "Stream cancelled");
                return;
            }
            item = stream.next() => match item {
                Some(Ok(candle)) => on_event(StreamEvent::Data(candle)),
                Some(Err(error)) => {
                    tracing::warn!(
                        symbol = %request.symbol,
                        error = %error,
                        "Stream terminated with error"
                    );
                    on_event(StreamEvent::Error(error));
                    return;
                }
                // Remote side completed the call; no event is emitted.
                None => {
                    tracing::debug!(symbol = %request.symbol, "Stream ended");
                    return;
                }
            },
        }
    }
}
