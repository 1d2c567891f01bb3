//! Client configuration.
//!
//! Every option can be given as a CLI flag or a `CHIBI_SYNC_*` environment
//! variable, with the flag taking precedence.
//!
//! # Example
//!
//! ```no_run
//! use chibi_client::ClientConfig;
//!
//! let config = ClientConfig::from_args();
//! config.validate().expect("Invalid configuration");
//!
//! println!("relay will bind to: {}", config.relay_bind);
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::ConfigError;
use crate::poll::PollSettings;

/// Client configuration loaded from CLI args and environment variables.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "chibi-client",
    about = "Keeps Chibi-Robo! running in Dolphin in sync with a multiworld session",
    version
)]
pub struct ClientConfig {
    /// Remote session server as host:port
    #[arg(long, env = "CHIBI_SYNC_SERVER")]
    pub server: Option<String>,

    /// Slot name to connect as (defaults to the artifact's player name)
    #[arg(long, env = "CHIBI_SYNC_NAME")]
    pub name: Option<String>,

    /// Session password
    #[arg(long, env = "CHIBI_SYNC_PASSWORD")]
    pub password: Option<String>,

    /// Loopback address the local relay listens on
    #[arg(long, env = "CHIBI_SYNC_RELAY_BIND", default_value = "127.0.0.1:11311")]
    pub relay_bind: String,

    /// Output artifact produced by the generator for this slot
    #[arg(long, env = "CHIBI_SYNC_ARTIFACT")]
    pub artifact: Option<PathBuf>,

    /// Milliseconds between poll iterations
    #[arg(long, env = "CHIBI_SYNC_POLL_INTERVAL_MS", default_value_t = 50)]
    pub poll_interval_ms: u64,

    /// Seconds to wait after losing the emulator
    #[arg(long, env = "CHIBI_SYNC_BACKOFF_SECS", default_value_t = 5)]
    pub backoff_secs: u64,

    /// Milliseconds between relay outbox flushes
    #[arg(long, env = "CHIBI_SYNC_DRAIN_INTERVAL_MS", default_value_t = 100)]
    pub drain_interval_ms: u64,
}

impl ClientConfig {
    /// Parse configuration from command-line arguments.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }

    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub const fn backoff(&self) -> Duration {
        Duration::from_secs(self.backoff_secs)
    }

    pub const fn drain_interval(&self) -> Duration {
        Duration::from_millis(self.drain_interval_ms)
    }

    pub const fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: self.poll_interval(),
            backoff: self.backoff(),
        }
    }

    /// Parse the relay address and require it to be loopback.
    pub fn relay_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr: SocketAddr = self
            .relay_bind
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidBindAddress {
                address: self.relay_bind.clone(),
                reason: e.to_string(),
            })?;

        if !addr.ip().is_loopback() {
            return Err(ConfigError::InvalidBindAddress {
                address: self.relay_bind.clone(),
                reason: "relay must bind to a loopback address".to_string(),
            });
        }
        Ok(addr)
    }

    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - An interval is zero
    /// - The artifact file doesn't exist
    /// - The relay address is not a loopback address
    /// - A server is given without any way to learn the slot name
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("--poll-interval-ms", self.poll_interval_ms),
            ("--backoff-secs", self.backoff_secs),
            ("--drain-interval-ms", self.drain_interval_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroInterval { name });
            }
        }

        if let Some(artifact) = &self.artifact {
            if !artifact.exists() {
                return Err(ConfigError::MissingRequired(format!(
                    "artifact file not found: {}",
                    artifact.display()
                )));
            }
        }

        self.relay_addr()?;

        if self.server.is_some() && self.name.is_none() && self.artifact.is_none() {
            return Err(ConfigError::MissingRequired(
                "--server requires --name or --artifact".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn parse(args: &[&str]) -> ClientConfig {
        ClientConfig::try_parse_from(std::iter::once("chibi-client").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);
        assert_eq!(config.relay_bind, "127.0.0.1:11311");
        assert_eq!(config.poll_interval(), Duration::from_millis(50));
        assert_eq!(config.backoff(), Duration::from_secs(5));
        assert_eq!(config.drain_interval(), Duration::from_millis(100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = parse(&["--backoff-secs", "0"]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroInterval { name: "--backoff-secs" })
        ));
    }

    #[test]
    fn test_relay_must_be_loopback() {
        let config = parse(&["--relay-bind", "0.0.0.0:11311"]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBindAddress { .. })
        ));

        let config = parse(&["--relay-bind", "[::1]:0"]);
        assert!(config.validate().is_ok());

        let config = parse(&["--relay-bind", "localhost"]);
        assert!(config.relay_addr().is_err());
    }

    #[test]
    fn test_missing_artifact_rejected() {
        let config = parse(&["--artifact", "/nonexistent/chibi.json"]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingRequired(_))
        ));

        let file = NamedTempFile::new().unwrap();
        let config = parse(&["--artifact", file.path().to_str().unwrap()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_needs_a_name() {
        let config = parse(&["--server", "localhost:38281"]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingRequired(_))
        ));

        let config = parse(&["--server", "localhost:38281", "--name", "Robo"]);
        assert!(config.validate().is_ok());
    }
}
