//! voicelink: a minimal voice-message exchange server
//!
//! Clients connect over TCP and exchange framed text/binary messages:
//! - REGISTER creates a user in the in-memory credential store
//! - LOGIN checks credentials against it
//! - AUDIO uploads a raw PCM payload, persisted to a single file
//!
//! Features:
//! - One session task per connection, strict request/response alternation
//! - Concurrency-safe shared credential store
//! - Configuration via CLI arguments or TOML file

mod audio;
mod config;
mod frame;
mod protocol;
mod server;
mod store;

use config::Config;
use server::Server;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!(
        listen = %config.listen,
        audio_path = %config.audio_path.display(),
        max_frame_len = config.max_frame_len,
        "Starting voicelink server"
    );

    let server = Server::new(config);
    server.run().await
}
