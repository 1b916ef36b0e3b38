//! Infrastructure layer - Adapters and external integrations.

pub mod config;
pub mod grpc;
pub mod telemetry;
