use clap::{Arg, Command};
use std::net::SocketAddr;
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod http;
mod scrape;
mod utils;

#[tokio::main]
async fn main() {
    let matches = Command::new("webtext")
        .version(env!("CARGO_PKG_VERSION"))
        .about("HTTP service that strips web pages and PDF documents down to plain text")
        .long_about(
            "Endpoints:\n\
            - POST /scrape: fetch a list of URLs and return their combined plain text\n\
            - POST /process: extract text from an uploaded PDF plus an optional URL list\n\
            - GET /health: liveness probe",
        )
        .arg(
            Arg::new("bind")
                .long("bind")
                .value_name("ADDR")
                .help("Socket address to listen on (default: 0.0.0.0:8000)")
                .action(clap::ArgAction::Set),
        )
        .get_matches();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let bind = matches
        .get_one::<String>("bind")
        .cloned()
        .or_else(|| std::env::var("WEBTEXT_BIND").ok())
        .unwrap_or_else(|| "0.0.0.0:8000".to_string());

    let addr: SocketAddr = match bind.parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Invalid bind address '{}': {}", bind, e);
            process::exit(1);
        }
    };

    info!("Starting webtext server on {}", addr);

    if let Err(e) = http::server::serve(addr).await {
        error!("Server error: {}", e);
        process::exit(1);
    }
}
