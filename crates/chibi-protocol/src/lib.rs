//! Command types and JSON codec for a multiworld session.
//!
//! The session exchanges frames, each a JSON array of command objects
//! discriminated by a `cmd` field. This crate models the commands chibi-sync
//! inspects or rewrites as typed structs and passes everything else through
//! untouched:
//!
//! - [`Command`]: closed enum of known shapes plus [`Command::Unknown`]
//! - [`encode`] / [`decode`]: frame codec
//! - [`text::render`]: plain-text rendering of `PrintJSON` fragments
//!
//! # Example
//!
//! ```
//! use chibi_protocol::{Command, decode, encode};
//!
//! let commands = decode(r#"[{"cmd": "RoomInfo", "seed_name": "42"}]"#)?;
//! assert_eq!(commands[0].name(), "RoomInfo");
//!
//! let frame = encode(&commands)?;
//! assert!(frame.contains("\"seed_name\":\"42\""));
//! # Ok::<(), chibi_protocol::ProtocolError>(())
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic))]

pub mod codec;
pub mod command;
pub mod error;
pub mod text;

pub use codec::{decode, encode};
pub use command::{
    Bounce, CLIENT_GOAL, Command, Connect, Connected, ConnectionRefused, ITEMS_HANDLING_ALL,
    JsonMessagePart, LocationChecks, NetworkItem, NetworkPlayer, NetworkVersion, PrintJson,
    ReceivedItems, RoomInfo, RoomUpdate, StatusUpdate,
};
pub use error::{ProtocolError, Result};
