//! Structured logging setup for the messenger binaries.

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static INIT: Once = Once::new();

/// Initialize tracing for the service named `service`.
///
/// The filter is read from `RUST_LOG` and defaults to `info`.
pub fn init(service: &str) {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_ansi(true).compact().with_target(true))
            .init();

        tracing::info!(service = %service, "=== Service initialized ===");
    });
}
