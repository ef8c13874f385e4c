//! Serve loop shared by the messenger binaries.

use std::net::SocketAddr;

use anyhow::Context;
use messenger_core::transport::grpc::proto::MESSENGER_DESCRIPTOR_SET;
use tonic::transport::server::Router;
use tonic_reflection::server::Builder;
use tracing::{info, warn};

/// Parse the `address:port` pair given on the command line.
pub fn socket_addr(address: &str, port: u16) -> anyhow::Result<SocketAddr> {
    format!("{address}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {address}:{port}"))
}

/// Serve `router` on `address` until Ctrl-C is received.
///
/// With `reflection`, the gRPC reflection service is registered alongside.
pub async fn serve(mut router: Router, address: SocketAddr, reflection: bool) -> anyhow::Result<()> {
    if reflection {
        let reflection_service = Builder::configure()
            .register_encoded_file_descriptor_set(MESSENGER_DESCRIPTOR_SET)
            .build_v1()?;
        router = router.add_service(reflection_service);
    }

    info!("Listening on {address}");
    router.serve_with_shutdown(address, shutdown_signal()).await?;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(error) => warn!("Unable to listen for shutdown signal: {error}"),
    }
}
