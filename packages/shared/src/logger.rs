//! Logger setup shared by the server and client binaries.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the binary's own crate logs at
/// `default_level` and everything else at `warn`.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(bin_name, default_level)));

    // A subscriber may already be installed (tests, embedding); keep that one.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init();
}

fn default_directives(bin_name: &str, default_level: &str) -> String {
    let crate_name = bin_name.replace('-', "_");
    format!(
        "warn,{crate_name}={default_level},agora_shared={default_level},tower_http={default_level}"
    )
}
