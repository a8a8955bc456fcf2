//! # Wall
//!
//! Terminal client for the wall: a live, newest-first feed of posts with a
//! compose box. Talks to the hosted backend when configured, otherwise runs
//! against an in-memory one.

mod command;
mod config;
mod render;
mod session;
mod state;
mod telemetry;

use wall_core::Wall;

use config::AppConfig;
use session::Session;
use telemetry::TelemetryConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    telemetry::init_telemetry(&TelemetryConfig::from_env());

    // Load configuration
    let config = AppConfig::from_env();

    tracing::info!(
        user = %config.identity.name,
        channel = %config.channel,
        "Starting wall"
    );

    let backend = state::build_backend(&config);
    let wall = Wall::new(backend, config.identity).with_channel(config.channel);

    Session::new(wall).run().await
}
