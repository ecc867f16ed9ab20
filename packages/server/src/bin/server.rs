//! Atelier collaboration server binary.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin atelier-server -- --port 3001
//! ```

use clap::Parser;

use atelier_server::{ServerConfig, run};
use atelier_shared::logger::setup_logger;

#[derive(Parser)]
#[command(name = "atelier-server", about = "Atelier collaboration server")]
struct Args {
    /// Bind host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Bind port
    #[arg(long, default_value_t = 3001)]
    port: u16,

    /// Token signing secret
    #[arg(long, env = "ATELIER_SECRET", default_value = "dev-secret-change-me")]
    secret: String,

    /// AI completion endpoint (POST {prompt} -> {text}); echoes locally
    /// when omitted
    #[arg(long, env = "ATELIER_AI_ENDPOINT")]
    ai_endpoint: Option<String>,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();
    let config = ServerConfig {
        host: args.host,
        port: args.port,
        secret: args.secret,
        ai_endpoint: args.ai_endpoint,
    };

    if let Err(e) = run(config).await {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}
