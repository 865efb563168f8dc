//! The computing authority: accepts a concurrent stream of independent
//! request/response exchanges, one per incoming connection, with no state
//! shared across connections.

use anyhow::Result;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shannon-server")]
#[command(about = "Shannon encoding authority", version)]
struct Args {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 4321)]
    port: u16,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let listener = TcpListener::bind((args.bind.as_str(), args.port)).await?;
    info!(addr = %listener.local_addr()?, "authority listening");

    loop {
        let (stream, peer) = listener.accept().await?;
        // One task per connection. A failed exchange is fatal to that
        // connection only.
        tokio::spawn(async move {
            if let Err(e) = shannon_core::serve_connection(stream).await {
                warn!(%peer, error = %e, "connection failed");
            }
        });
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
