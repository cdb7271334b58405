//! Client configuration.

use clap::Parser;

/// Agora terminal chat client
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "agora-client", version, about = "Terminal client for Agora chat rooms")]
pub struct ClientConfig {
    /// Base URL of the server
    #[arg(long, env = "AGORA_SERVER", default_value = "http://127.0.0.1:8080")]
    pub server: String,

    /// Display name attached to sent messages
    #[arg(short, long, env = "AGORA_AUTHOR")]
    pub author: Option<String>,

    /// Room to join on start
    #[arg(short, long)]
    pub room: Option<String>,

    /// Log level for agora crates (overridden by RUST_LOG)
    #[arg(long, env = "AGORA_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}
