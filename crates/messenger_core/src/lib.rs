//! Shared core of the messenger services.
//!
//! Every service of the messenger (accounts, API gateway, mailer) is built from
//! the same two pieces: an in-memory, concurrency-safe [`Registry`] handing out
//! unique identifiers, and a declarative validation pipeline that rejects
//! malformed requests with the complete list of field violations before any
//! handler runs.
//!
//! The services are exposed over gRPC with [`tonic`], a Rust implementation of
//! gRPC. Each API is a [`tower::Service`], so the validation pipeline is simply a
//! [`tower::Layer`] stacked on top of it.
//!
//! [`tonic`]: https://docs.rs/tonic
//! [`Registry`]: messaging::core::registry::Registry

#[cfg(test)]
mod tests;

pub mod messaging;
pub mod transport;

#[cfg(test)]
pub mod messenger_tracing {
    use std::sync::Once;

    use tracing_subscriber::{EnvFilter, fmt};

    static INIT: Once = Once::new();

    /// Initialize tracing for tests.
    ///
    /// Logs are filtered with `RUST_LOG` and hidden by default.
    pub fn init() {
        INIT.call_once(|| {
            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));

            fmt().with_target(false).with_test_writer().with_env_filter(filter).init();
        });
    }
}
