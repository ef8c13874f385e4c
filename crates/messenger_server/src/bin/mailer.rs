use clap::Parser;
use messenger_core::{
    messaging::init_mailer,
    transport::grpc::{
        DEFAULT_MAILER_PORT, MailerHandler,
        proto::mailer::mailer_service_server::MailerServiceServer,
    },
};
use messenger_server::{logging, server};
use tonic::transport::Server;

#[derive(Parser, Debug)]
#[command(name = "mailer")]
#[command(about = "Messenger mailer service")]
struct MailerArgs {
    /// Server address to bind to
    #[arg(short, long, env = "MAILER_ADDRESS", default_value = "0.0.0.0")]
    address: String,

    /// Server port to bind to
    #[arg(short, long, env = "MAILER_PORT", default_value_t = DEFAULT_MAILER_PORT)]
    port: u16,

    /// Enable gRPC reflection
    #[arg(short, long, default_value_t = false)]
    reflection: bool,
}

#[cfg(not(tarpaulin_include))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = MailerArgs::parse();
    logging::init("mailer");

    let address = server::socket_addr(&args.address, args.port)?;
    let router = Server::builder()
        .add_service(MailerServiceServer::new(MailerHandler::new(init_mailer())));

    server::serve(router, address, args.reflection).await
}
