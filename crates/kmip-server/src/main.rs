use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use kmip_server::server::{init_tracing, KmipServer, TlsOptions};

/// Command line arguments for the KMIP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The address to bind the server to
    #[arg(long, env = "KMIP_ADDR", default_value = "0.0.0.0:5696")]
    addr: SocketAddr,

    /// Server certificate (PEM)
    #[arg(long, env = "KMIP_CERT", default_value = "/certs/server.crt")]
    cert: PathBuf,

    /// Server private key (PEM)
    #[arg(long, env = "KMIP_KEY", default_value = "/certs/server.key")]
    key: PathBuf,

    /// CA bundle used to verify client certificates (PEM)
    #[arg(long, env = "KMIP_CA", default_value = "/certs/ca.pem")]
    ca: PathBuf,

    /// Accept clients that present no certificate (testing only)
    #[arg(long)]
    no_client_auth: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    if args.no_client_auth {
        warn!("client certificate verification disabled; not for production");
    }

    // The builder loads the TLS material, so a bad certificate path fails
    // here rather than on the first connection.
    let server = KmipServer::builder()
        .with_addr(args.addr)
        .with_tls(TlsOptions {
            cert_path: args.cert,
            key_path: args.key,
            ca_path: args.ca,
            require_client_auth: !args.no_client_auth,
        })
        .build()?;

    let shutdown = server.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            shutdown.cancel();
        }
    });

    server.serve().await
}
