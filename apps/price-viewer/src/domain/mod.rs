//! Domain layer - Core candle and subscription types with no transport
//! dependencies.

pub mod candle;
pub mod subscription;

pub use candle::{Candle, Symbol};
pub use subscription::{
    ConnectionState, StreamError, StreamEvent, StreamSnapshot, SubscriptionRequest,
};
