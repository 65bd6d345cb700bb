//! Helpdesk Gateway Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p helpdesk-gateway
//! ```
//!
//! Configuration is loaded from environment variables.

use helpdesk_common::{try_init_tracing, try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Config decides the log format, so load it first
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let _ = try_init_tracing();
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        name = %config.app.name,
        env = ?config.app.env,
        address = %config.gateway.address(),
        outbound_buffer = config.relay.outbound_buffer,
        hub_buffer = config.relay.hub_buffer,
        "Configuration loaded"
    );

    if let Err(e) = helpdesk_gateway::run(config).await {
        error!(error = %e, "Gateway failed");
        std::process::exit(1);
    }
}
