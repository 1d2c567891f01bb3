//! chibi-client binary entry point.
//!
//! A thin wrapper around the chibi-client library that:
//! 1. Initializes logging
//! 2. Parses and validates configuration
//! 3. Runs the client until `/exit` or Ctrl-C
//!
//! For library usage, see the chibi-client crate documentation.

use anyhow::Result;
use chibi_client::{Client, ClientConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ClientConfig::from_args();

    tracing::info!(
        "Configuration loaded: relay={}, server={}, artifact={:?}",
        config.relay_bind,
        config.server.as_deref().unwrap_or("none"),
        config.artifact
    );

    config.validate()?;

    let client = Client::new(config)?;
    client.run().await?;

    Ok(())
}
