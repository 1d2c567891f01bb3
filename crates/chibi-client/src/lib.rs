//! Chibi-Robo! multiworld sync client.
//!
//! Keeps a Chibi-Robo! game running in Dolphin consistent with a remote
//! multiworld session: received items are delivered into the game, checked
//! locations and goal completion are reported back, and a loopback relay
//! lets a local tracker or text client share the session.
//!
//! # Architecture
//!
//! - `connection`: attach/detach lifecycle and game signature check
//! - `inventory`: the item ledger and the mailbox-based synchronizer
//! - `scanner`: per-stage location bitfield diffing and goal detection
//! - `area`: stage transition detection
//! - `poll`: the loop driving the three components above
//! - `session`: state shared between the session, relay and poll loop
//! - `relay`: loopback server for a single local peer
//! - `remote`: reconnecting client of the remote session
//! - `tables`: item, location and stage catalogs
//! - `artifact`: the generator's per-player output file
//! - `config`: CLI and environment configuration
//!
//! # Example
//!
//! ```no_run
//! use chibi_client::{Client, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     tracing_subscriber::fmt::init();
//!
//!     let config = ClientConfig::from_args();
//!     config.validate()?;
//!
//!     let client = Client::new(config)?;
//!     client.run().await?;
//!
//!     Ok(())
//! }
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic))]

pub mod area;
pub mod artifact;
pub mod client;
pub mod config;
pub mod connection;
pub mod console;
pub mod error;
pub mod events;
pub mod inventory;
pub mod layout;
pub mod poll;
pub mod relay;
pub mod remote;
pub mod scanner;
pub mod session;
pub mod shutdown;
pub mod status;
pub mod tables;

pub use artifact::{GameOptions, OutputArtifact};
pub use client::{Client, OfflineLink};
pub use config::ClientConfig;
pub use connection::{Connection, Tick};
pub use error::{ArtifactError, ClientError, ConfigError, RelayError, SessionError};
pub use events::{ClientEvent, EventSender};
pub use inventory::{InventorySynchronizer, ItemLedger, SyncStep};
pub use layout::MemoryLayout;
pub use poll::{Pace, PollLoop, PollSettings};
pub use relay::{Rejection, Relay, start_relay};
pub use remote::{RemoteLink, RemoteSession, RemoteSettings};
pub use scanner::{CheckedLocationSet, LocationScanner, ScanReport};
pub use session::{SessionHub, SessionLink};
pub use shutdown::{Shutdown, ShutdownSignal};
pub use status::{ConnectionStatus, StatusCell};
