//! gRPC Streaming Client
//!
//! Adapter for the price engine's `price.v1.PriceStream` service.
//!
//! # Architecture
//!
//! - [`client::ClientHolder`] owns the lazily constructed channel shared by
//!   all subscriptions against one endpoint.
//! - [`source::GrpcCandleSource`] implements the [`CandleSource`] port by
//!   opening `StreamAggregates` calls and decoding wire candles.
//! - [`codec`] converts wire messages into domain candles.
//!
//! The generated protobuf stubs are committed under `proto/` so builds do
//! not require `protoc`; regenerate them from
//! `packages/proto/price/v1/price.proto` when the contract changes. The
//! server stubs exist for integration tests that host an in-process engine.
//!
//! [`CandleSource`]: crate::application::ports::CandleSource

pub mod client;
pub mod codec;
pub mod source;

// Allow clippy warnings and missing docs in generated code
#[allow(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]
pub mod proto {
    pub mod price {
        pub mod v1 {
            include!("proto/price.v1.rs");
            include!("proto/price.v1.tonic.rs");
        }
    }
}

pub use client::ClientHolder;
pub use source::GrpcCandleSource;
