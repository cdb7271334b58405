//! Server configuration (command line flags with environment fallbacks).

use clap::Parser;

/// Default capacity of each connection's outbound queue
pub const DEFAULT_OUTBOX_CAPACITY: usize = 256;

/// Agora chat server configuration
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "agora-server", version, about = "Room-scoped real-time chat server")]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "AGORA_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "AGORA_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Messages kept per room before the oldest is evicted (unbounded when unset)
    #[arg(long, env = "AGORA_HISTORY_LIMIT", value_parser = parse_positive)]
    pub history_limit: Option<usize>,

    /// Frames buffered per connection before deliveries to it are dropped
    #[arg(long, env = "AGORA_OUTBOX_CAPACITY", default_value_t = DEFAULT_OUTBOX_CAPACITY, value_parser = parse_positive)]
    pub outbox_capacity: usize,

    /// Log level for agora crates (overridden by RUST_LOG)
    #[arg(long, env = "AGORA_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    /// `host:port` to bind
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            history_limit: None,
            outbox_capacity: DEFAULT_OUTBOX_CAPACITY,
            log_level: "info".to_string(),
        }
    }
}

fn parse_positive(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
