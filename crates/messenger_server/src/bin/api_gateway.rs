use clap::Parser;
use messenger_core::{
    messaging::init_gateway,
    transport::grpc::{
        DEFAULT_GATEWAY_PORT, GatewayHandler,
        proto::gateway::api_gateway_service_server::ApiGatewayServiceServer,
    },
};
use messenger_server::{logging, server};
use tonic::transport::Server;

#[derive(Parser, Debug)]
#[command(name = "api-gateway")]
#[command(about = "Messenger API gateway")]
struct GatewayArgs {
    /// Server address to bind to
    #[arg(short, long, env = "GATEWAY_ADDRESS", default_value = "0.0.0.0")]
    address: String,

    /// Server port to bind to
    #[arg(short, long, env = "GATEWAY_PORT", default_value_t = DEFAULT_GATEWAY_PORT)]
    port: u16,

    /// Enable gRPC reflection
    #[arg(short, long, default_value_t = false)]
    reflection: bool,
}

#[cfg(not(tarpaulin_include))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = GatewayArgs::parse();
    logging::init("api-gateway");

    let address = server::socket_addr(&args.address, args.port)?;
    let router = Server::builder()
        .add_service(ApiGatewayServiceServer::new(GatewayHandler::new(init_gateway())));

    server::serve(router, address, args.reflection).await
}
