//! Agora terminal chat client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin agora-client -- --author alice --room 123
//! ```

use agora_client::ClientConfig;
use agora_shared::logger::setup_logger;
use clap::Parser;

#[tokio::main]
async fn main() {
    let config = ClientConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    // Run the client
    if let Err(e) = agora_client::run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
