//! Subscription Lifecycle Binding
//!
//! A small state machine that owns at most one live subscription at a time
//! and exposes its progress as observable state. States map onto the
//! snapshot fields:
//!
//! - **Idle**: disabled or invalid parameters, nothing open.
//! - **Loading**: subscription open, no event received yet.
//! - **Live**: latest candle held in `data`.
//! - **Failed**: terminal error held in `error`.
//!
//! # Generations
//!
//! Every (re)subscription increments a generation counter and the event
//! callback captures the generation it was created under. An event whose
//! generation no longer matches is silently dropped, so a late event from a
//! cancelled stream can never write into the state of its successor. The
//! check runs inside the watch channel's modify closure, which serialises it
//! against the parameter-change reset.
//!
//! # Ordering
//!
//! On a parameter change the previous subscription's cancellation is
//! requested strictly before the new subscription is opened, so two live
//! streams never feed the same observable state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use crate::domain::{StreamEvent, StreamSnapshot, SubscriptionRequest, Symbol};

use super::subscriber::{StreamSubscriber, SubscriptionHandle};

// =============================================================================
// Binding Parameters
// =============================================================================

/// Input parameters driving the lifecycle binding.
///
/// Changing any field invalidates the current subscription. `enabled =
/// false`, an empty symbol, or a non-positive interval short-circuit to
/// Idle without opening a transport stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingParams {
    /// Symbol to subscribe to.
    pub symbol: Symbol,
    /// Aggregation window size in milliseconds.
    pub interval_ms: i32,
    /// Whether the binding should hold a live subscription at all.
    pub enabled: bool,
}

impl BindingParams {
    /// Enabled parameters for a symbol/interval pair.
    #[must_use]
    pub fn new(symbol: impl Into<Symbol>, interval_ms: i32) -> Self {
        Self {
            symbol: symbol.into(),
            interval_ms,
            enabled: true,
        }
    }

    /// The same parameters with `enabled = false`.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// The subscription request these parameters call for, if any.
    fn request(&self) -> Option<SubscriptionRequest> {
        if !self.enabled {
            return None;
        }
        let request = SubscriptionRequest::new(self.symbol.clone(), self.interval_ms);
        request.is_valid().then_some(request)
    }
}

// =============================================================================
// Stream Binding
// =============================================================================

/// Reactive binding that (re)creates a subscription whenever its parameters
/// change and exposes the result as a [`watch`] channel of snapshots.
///
/// At most one live subscription exists per binding instance at any time.
/// Dropping the binding cancels the active subscription and stops all state
/// updates.
pub struct StreamBinding {
    subscriber: StreamSubscriber,
    state: Arc<watch::Sender<StreamSnapshot>>,
    generation: Arc<AtomicU64>,
    params: Option<BindingParams>,
    active: Option<SubscriptionHandle>,
}

impl StreamBinding {
    /// Create an idle binding over the given subscriber.
    #[must_use]
    pub fn new(subscriber: StreamSubscriber) -> Self {
        let (state, _) = watch::channel(StreamSnapshot::idle());
        Self {
            subscriber,
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
            params: None,
            active: None,
        }
    }

    /// Observe the binding's state. Receivers see the latest snapshot.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<StreamSnapshot> {
        self.state.subscribe()
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> StreamSnapshot {
        self.state.borrow().clone()
    }

    /// Apply new parameters, resubscribing when they differ.
    ///
    /// Identical parameters are a no-op. Otherwise the current subscription
    /// is cancelled first, then a new one is opened if the parameters are
    /// enabled and valid; the state resets to Loading (or Idle).
    pub fn set_params(&mut self, params: BindingParams) {
        if self.params.as_ref() == Some(&params) {
            return;
        }
        tracing::info!(
            symbol = %params.symbol,
            interval_ms = params.interval_ms,
            enabled = params.enabled,
            "Binding parameters changed"
        );
        let request = params.request();
        self.params = Some(params);
        self.resubscribe(request);
    }

    /// Tear down the current subscription and replace it per `request`.
    fn resubscribe(&mut self, request: Option<SubscriptionRequest>) {
        // New generation first: anything still in flight is stale from here.
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        // Cancellation of the previous subscription is requested before the
        // next one is opened.
        if let Some(handle) = self.active.take() {
            handle.cancel();
        }

        let Some(request) = request else {
            self.state.send_replace(StreamSnapshot::idle());
            return;
        };

        self.state.send_replace(StreamSnapshot::loading());

        let current = Arc::clone(&self.generation);
        let state = Arc::clone(&self.state);
        let handle = self.subscriber.subscribe(request, move |event| {
            state.send_if_modified(|snapshot| {
                if current.load(Ordering::SeqCst) != generation {
                    // Stale event from a superseded subscription.
                    return false;
                }
                apply_event(snapshot, event);
                true
            });
        });
        self.active = Some(handle);
    }
}

impl Drop for StreamBinding {
    fn drop(&mut self) {
        // Invalidate outstanding callbacks, then cancel. No further state
        // updates can occur.
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.active.take() {
            handle.cancel();
        }
    }
}

/// Fold one stream event into the snapshot.
fn apply_event(snapshot: &mut StreamSnapshot, event: StreamEvent) {
    match event {
        StreamEvent::Data(candle) => {
            snapshot.data = Some(candle);
            snapshot.error = None;
            snapshot.is_loading = false;
            snapshot.is_connected = true;
        }
        StreamEvent::Error(error) => {
            snapshot.error = Some(error);
            snapshot.is_loading = false;
            snapshot.is_connected = false;
        }
    }
}
