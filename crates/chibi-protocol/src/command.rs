//! Command shapes exchanged with a multiworld session.
//!
//! Each known `cmd` value maps to one variant of [`Command`]. Fields this
//! crate does not model are kept in an `extra` map on every struct so that
//! a decoded command re-encodes without losing information. Objects whose
//! `cmd` is unknown, or whose known shape fails to decode, are carried as
//! [`Command::Unknown`] with the raw JSON untouched.

use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

/// Client status value reported once the player's goal is complete.
pub const CLIENT_GOAL: i64 = 30;

/// Item handling flags requesting every item, including our own and the
/// starting inventory.
pub const ITEMS_HANDLING_ALL: u8 = 0b111;

/// A single item grant as tracked by the session.
///
/// Two grants are the same grant when their [`NetworkItem::key`] matches;
/// the session may resend a grant after a reconnect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkItem {
    /// Remote item id
    pub item: i64,
    /// Remote location id the item was found at (negative for server grants)
    pub location: i64,
    /// Slot of the player who found the item
    pub player: i64,
    /// Classification flags
    #[serde(default)]
    pub flags: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NetworkItem {
    /// Identity of the grant, ignoring fields this crate does not model.
    pub const fn key(&self) -> (i64, i64, i64, u32) {
        (self.item, self.location, self.player, self.flags)
    }
}

/// A player entry in `Connected` and `RoomUpdate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkPlayer {
    pub team: i64,
    pub slot: i64,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Client version triple sent with `Connect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkVersion {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
    #[serde(default = "version_class")]
    pub class: String,
}

fn version_class() -> String {
    "Version".to_string()
}

impl NetworkVersion {
    /// Build a version triple.
    pub fn new(major: u32, minor: u32, build: u32) -> Self {
        Self {
            major,
            minor,
            build,
            class: version_class(),
        }
    }
}

/// Authentication request from a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Connect {
    #[serde(default)]
    pub game: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Seed the client's save file belongs to (sent by the game-side client)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<NetworkVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_handling: Option<u8>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_data: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Successful authentication reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connected {
    pub team: i64,
    pub slot: i64,
    #[serde(default)]
    pub players: Vec<NetworkPlayer>,
    #[serde(default)]
    pub slot_info: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Connected {
    /// Drop every player entry except the one for our own slot and team.
    ///
    /// Leaves `players` empty when our own entry is missing.
    pub fn narrow_players_to_self(&mut self) {
        let (slot, team) = (self.slot, self.team);
        self.players.retain(|p| p.slot == slot && p.team == team);
        self.players.truncate(1);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRefused {
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Room announcement sent by the session on connect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomInfo {
    pub seed_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub players: Option<Vec<NetworkPlayer>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A batch of item grants starting at `index` of the player's item list.
///
/// `index == 0` means the batch is the complete list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceivedItems {
    pub index: usize,
    #[serde(default)]
    pub items: Vec<NetworkItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationChecks {
    pub locations: Vec<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One fragment of a `PrintJSON` message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonMessagePart {
    #[serde(default)]
    pub text: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JsonMessagePart {
    /// A plain text fragment.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrintJson {
    #[serde(default)]
    pub data: Vec<JsonMessagePart>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PrintJson {
    /// A single-fragment notice with no message type.
    pub fn notice(text: impl Into<String>) -> Self {
        Self {
            data: vec![JsonMessagePart::text(text)],
            ..Self::default()
        }
    }
}

/// Arbitrary data relayed to other clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounce {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub games: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A session command, discriminated by its `cmd` field.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Connect(Connect),
    Connected(Connected),
    ConnectionRefused(ConnectionRefused),
    RoomInfo(RoomInfo),
    RoomUpdate(RoomUpdate),
    ReceivedItems(ReceivedItems),
    LocationChecks(LocationChecks),
    StatusUpdate(StatusUpdate),
    PrintJson(PrintJson),
    Bounce(Bounce),
    /// Any other object, kept verbatim (including its `cmd`)
    Unknown(Value),
}

impl Command {
    /// The `cmd` discriminator of this command.
    pub fn name(&self) -> &str {
        match self {
            Self::Connect(_) => "Connect",
            Self::Connected(_) => "Connected",
            Self::ConnectionRefused(_) => "ConnectionRefused",
            Self::RoomInfo(_) => "RoomInfo",
            Self::RoomUpdate(_) => "RoomUpdate",
            Self::ReceivedItems(_) => "ReceivedItems",
            Self::LocationChecks(_) => "LocationChecks",
            Self::StatusUpdate(_) => "StatusUpdate",
            Self::PrintJson(_) => "PrintJSON",
            Self::Bounce(_) => "Bounce",
            Self::Unknown(value) => value
                .get("cmd")
                .and_then(Value::as_str)
                .unwrap_or("<unknown>"),
        }
    }

    /// Decode a single command object. Never fails: anything that does not
    /// decode as a known shape becomes [`Command::Unknown`].
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut object) = value else {
            return Self::Unknown(value);
        };
        let Some(cmd) = object.get("cmd").and_then(Value::as_str).map(str::to_owned) else {
            return Self::Unknown(Value::Object(object));
        };

        object.remove("cmd");
        let body = Value::Object(object);
        let decoded = match cmd.as_str() {
            "Connect" => Connect::deserialize(&body).map(Self::Connect),
            "Connected" => Connected::deserialize(&body).map(Self::Connected),
            "ConnectionRefused" => {
                ConnectionRefused::deserialize(&body).map(Self::ConnectionRefused)
            }
            "RoomInfo" => RoomInfo::deserialize(&body).map(Self::RoomInfo),
            "RoomUpdate" => RoomUpdate::deserialize(&body).map(Self::RoomUpdate),
            "ReceivedItems" => ReceivedItems::deserialize(&body).map(Self::ReceivedItems),
            "LocationChecks" => LocationChecks::deserialize(&body).map(Self::LocationChecks),
            "StatusUpdate" => StatusUpdate::deserialize(&body).map(Self::StatusUpdate),
            "PrintJSON" => PrintJson::deserialize(&body).map(Self::PrintJson),
            "Bounce" => Bounce::deserialize(&body).map(Self::Bounce),
            _ => return Self::Unknown(with_cmd(body, &cmd)),
        };

        match decoded {
            Ok(command) => command,
            Err(e) => {
                debug!(cmd, error = %e, "command shape not recognized, keeping raw");
                Self::Unknown(with_cmd(body, &cmd))
            }
        }
    }

    /// Encode this command as a JSON object including its `cmd`.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        let body = match self {
            Self::Connect(c) => serde_json::to_value(c)?,
            Self::Connected(c) => serde_json::to_value(c)?,
            Self::ConnectionRefused(c) => serde_json::to_value(c)?,
            Self::RoomInfo(c) => serde_json::to_value(c)?,
            Self::RoomUpdate(c) => serde_json::to_value(c)?,
            Self::ReceivedItems(c) => serde_json::to_value(c)?,
            Self::LocationChecks(c) => serde_json::to_value(c)?,
            Self::StatusUpdate(c) => serde_json::to_value(c)?,
            Self::PrintJson(c) => serde_json::to_value(c)?,
            Self::Bounce(c) => serde_json::to_value(c)?,
            Self::Unknown(value) => return Ok(value.clone()),
        };
        Ok(with_cmd(body, self.name()))
    }
}

fn with_cmd(body: Value, cmd: &str) -> Value {
    match body {
        Value::Object(mut object) => {
            object.insert("cmd".to_string(), Value::String(cmd.to_string()));
            Value::Object(object)
        }
        other => other,
    }
}

impl Serialize for Command {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Command {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer).map_err(D::Error::custom)?;
        Ok(Self::from_value(value))
    }
}

macro_rules! impl_from_shape {
    ($($shape:ident),* $(,)?) => {
        $(
            impl From<$shape> for Command {
                fn from(shape: $shape) -> Self {
                    Self::$shape(shape)
                }
            }
        )*
    };
}

impl_from_shape!(
    Connect,
    Connected,
    ConnectionRefused,
    RoomInfo,
    RoomUpdate,
    ReceivedItems,
    LocationChecks,
    StatusUpdate,
    PrintJson,
    Bounce,
);
