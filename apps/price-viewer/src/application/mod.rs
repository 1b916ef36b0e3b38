//! Application layer - Subscription lifecycle use cases and port definitions.

pub mod binding;
pub mod ports;
pub mod subscriber;

pub use binding::{BindingParams, StreamBinding};
pub use ports::{CandleSource, CandleStream};
pub use subscriber::{StreamSubscriber, SubscriptionHandle};
