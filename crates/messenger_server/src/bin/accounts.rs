use clap::Parser;
use messenger_core::{
    messaging::init_accounts,
    transport::grpc::{
        AccountsHandler, DEFAULT_ACCOUNTS_PORT,
        proto::accounts::accounts_service_server::AccountsServiceServer,
    },
};
use messenger_server::{logging, server};
use tonic::transport::Server;

#[derive(Parser, Debug)]
#[command(name = "accounts")]
#[command(about = "Messenger accounts service")]
struct AccountsArgs {
    /// Server address to bind to
    #[arg(short, long, env = "ACCOUNTS_ADDRESS", default_value = "0.0.0.0")]
    address: String,

    /// Server port to bind to
    #[arg(short, long, env = "ACCOUNTS_PORT", default_value_t = DEFAULT_ACCOUNTS_PORT)]
    port: u16,

    /// Enable gRPC reflection
    #[arg(short, long, default_value_t = false)]
    reflection: bool,
}

#[cfg(not(tarpaulin_include))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = AccountsArgs::parse();
    logging::init("accounts");

    let address = server::socket_addr(&args.address, args.port)?;
    let router = Server::builder()
        .add_service(AccountsServiceServer::new(AccountsHandler::new(init_accounts())));

    server::serve(router, address, args.reflection).await
}
