//! Transports exposing the messenger APIs.

pub mod grpc;
