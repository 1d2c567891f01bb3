//! Shared multiworld session state.
//!
//! [`SessionHub`] sits between the remote session task, the local relay and
//! the poll loop. Commands arriving from the session pass through
//! [`SessionHub::on_package`], which updates cached state, rewrites what
//! the local peer should see and queues it in the outbox the relay drains.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chibi_protocol::text::{self, NameResolver};
use chibi_protocol::{Command, NetworkPlayer, ReceivedItems, encode};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::events::{ClientEvent, EventSender};
use crate::inventory::ItemLedger;
use crate::tables::{items, locations};

/// Frames kept for the local peer before the oldest are dropped.
pub const OUTBOX_CAPACITY: usize = 1024;

/// Fire-and-forget channel to the remote session.
///
/// Implementations must not block: callers include the poll loop.
pub trait SessionLink: Send + Sync {
    fn send(&self, commands: Vec<Command>);
}

#[derive(Debug, Default)]
struct HubState {
    seed_name: Option<String>,
    auth: Option<String>,
    slot: Option<i64>,
    team: Option<i64>,
    me: Option<NetworkPlayer>,
    connected: bool,
    room_info: Option<String>,
    room_seed: Option<String>,
    connected_msg: Option<String>,
    awaiting_room_info: bool,
    outbox: VecDeque<String>,
}

/// Summary of the session for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub connected: bool,
    pub seed_name: Option<String>,
    pub auth: Option<String>,
    pub slot: Option<i64>,
    pub items_received: usize,
    pub outbox_len: usize,
}

/// State shared by the session task, relay and poll loop.
#[derive(Debug)]
pub struct SessionHub {
    state: Mutex<HubState>,
    ledger: Arc<ItemLedger>,
    generation: AtomicU64,
    events: EventSender,
}

impl SessionHub {
    /// Create a hub. `seed_name` and `auth` seed the relay's identity
    /// guards before the session has told us anything.
    pub fn new(seed_name: Option<String>, auth: Option<String>, events: EventSender) -> Self {
        Self {
            state: Mutex::new(HubState {
                seed_name,
                auth,
                ..HubState::default()
            }),
            ledger: Arc::new(ItemLedger::new()),
            generation: AtomicU64::new(0),
            events,
        }
    }

    pub fn ledger(&self) -> &Arc<ItemLedger> {
        &self.ledger
    }

    pub fn events(&self) -> &EventSender {
        &self.events
    }

    pub fn seed_name(&self) -> Option<String> {
        self.state.lock().seed_name.clone()
    }

    pub fn auth(&self) -> Option<String> {
        self.state.lock().auth.clone()
    }

    pub fn set_auth(&self, name: impl Into<String>) {
        self.state.lock().auth = Some(name.into());
    }

    /// Our slot, once the session has accepted us.
    pub fn slot(&self) -> Option<i64> {
        self.state.lock().slot
    }

    pub fn is_connected(&self) -> bool {
        self.state.lock().connected
    }

    /// Incremented on every accepted `Connected`. Consumers compare it to
    /// detect a fresh session.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn summary(&self) -> SessionSummary {
        let state = self.state.lock();
        SessionSummary {
            connected: state.connected,
            seed_name: state.seed_name.clone(),
            auth: state.auth.clone(),
            slot: state.slot,
            items_received: self.ledger.len(),
            outbox_len: state.outbox.len(),
        }
    }

    /// The session connection dropped.
    pub fn on_disconnect(&self) {
        let mut state = self.state.lock();
        state.connected = false;
        state.auth = None;
        state.slot = None;
        state.team = None;
        state.me = None;
        state.connected_msg = None;
        state.room_info = None;
    }

    /// Handle one command from the remote session.
    pub fn on_package(&self, command: Command) {
        debug!(cmd = command.name(), "session command");
        match command {
            Command::Connected(mut connected) => {
                connected.slot_info.clear();
                connected.narrow_players_to_self();

                let Some(frame) = encode_frame(Command::Connected(connected.clone())) else {
                    return;
                };

                let mut state = self.state.lock();
                state.connected = true;
                state.slot = Some(connected.slot);
                state.team = Some(connected.team);
                state.me = connected.players.first().cloned();
                state.connected_msg = Some(frame);
                self.generation.fetch_add(1, Ordering::AcqRel);
                info!(slot = connected.slot, team = connected.team, "session authenticated");

                if state.awaiting_room_info {
                    if let Some(room_info) = state.room_info.clone() {
                        push_bounded(&mut state.outbox, room_info);
                        if let Some(snapshot) = self.inventory_frame() {
                            push_bounded(&mut state.outbox, snapshot);
                        }
                        state.awaiting_room_info = false;
                    }
                }
            }
            Command::RoomUpdate(mut update) => {
                if update.players.is_some() {
                    update.players = Some(Vec::new());
                }
                self.queue(Command::RoomUpdate(update));
            }
            Command::ReceivedItems(received) => {
                if received.index == 0 {
                    self.ledger.replace(received.items.iter().cloned());
                } else {
                    self.ledger.extend(received.items.iter().cloned());
                }
                self.queue(Command::ReceivedItems(received));
            }
            Command::RoomInfo(info) => {
                let seed = info.seed_name.clone();
                let Some(frame) = encode_frame(Command::RoomInfo(info)) else {
                    return;
                };

                let mut state = self.state.lock();
                if state.room_seed.as_ref().is_some_and(|s| *s != seed) {
                    info!(seed = %seed, "session moved to a different seed");
                    self.ledger.start_epoch();
                }
                state.room_seed = Some(seed.clone());
                state.seed_name = Some(seed);
                state.room_info = Some(frame);
            }
            Command::PrintJson(print) => {
                let line = text::render(&print.data, self);
                self.events.emit(ClientEvent::Chat(line));
            }
            other => self.queue(other),
        }
    }

    /// Called when a local peer connects. Returns the room announcement to
    /// send it, or marks the hub as waiting for one.
    pub fn on_peer_accepted(&self) -> Option<String> {
        let mut state = self.state.lock();
        match (&state.room_info, state.connected) {
            (Some(room_info), true) => Some(room_info.clone()),
            _ => {
                state.awaiting_room_info = true;
                None
            }
        }
    }

    /// The cached `Connected` frame, if the session is up.
    pub fn connected_frame(&self) -> Option<String> {
        let state = self.state.lock();
        if state.connected {
            state.connected_msg.clone()
        } else {
            None
        }
    }

    /// Queue the full item list for the local peer.
    pub fn queue_inventory_snapshot(&self) {
        if !self.is_connected() {
            return;
        }
        if let Some(frame) = self.inventory_frame() {
            push_bounded(&mut self.state.lock().outbox, frame);
        }
    }

    /// Queue a command for the local peer.
    pub fn queue(&self, command: Command) {
        if let Some(frame) = encode_frame(command) {
            push_bounded(&mut self.state.lock().outbox, frame);
        }
    }

    /// Take every queued frame, oldest first.
    pub fn drain_outbox(&self) -> Vec<String> {
        self.state.lock().outbox.drain(..).collect()
    }

    /// Put frames that could not be delivered back at the front.
    pub fn requeue_front(&self, frames: Vec<String>) {
        let mut state = self.state.lock();
        for frame in frames.into_iter().rev() {
            state.outbox.push_front(frame);
        }
        while state.outbox.len() > OUTBOX_CAPACITY {
            state.outbox.pop_back();
        }
    }

    fn inventory_frame(&self) -> Option<String> {
        encode_frame(Command::ReceivedItems(ReceivedItems {
            index: 0,
            items: self.ledger.items(),
            ..ReceivedItems::default()
        }))
    }
}

impl NameResolver for SessionHub {
    fn player_name(&self, slot: i64) -> Option<String> {
        let state = self.state.lock();
        state
            .me
            .as_ref()
            .filter(|me| me.slot == slot)
            .map(|me| me.alias.clone())
    }

    fn item_name(&self, item: i64) -> Option<String> {
        items::name_of(item).map(str::to_string)
    }

    fn location_name(&self, location: i64) -> Option<String> {
        locations::name_of(location).map(str::to_string)
    }
}

fn encode_frame(command: Command) -> Option<String> {
    let name = command.name().to_string();
    match encode(&[command]) {
        Ok(frame) => Some(frame),
        Err(e) => {
            warn!(cmd = %name, error = %e, "dropping command that cannot be encoded");
            None
        }
    }
}

fn push_bounded(outbox: &mut VecDeque<String>, frame: String) {
    if outbox.len() >= OUTBOX_CAPACITY {
        warn!(capacity = OUTBOX_CAPACITY, "relay outbox full, dropping oldest frame");
        outbox.pop_front();
    }
    outbox.push_back(frame);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chibi_protocol::{
        Connected, JsonMessagePart, NetworkItem, PrintJson, RoomInfo, RoomUpdate, decode,
    };
    use pretty_assertions::assert_eq;
    use serde_json::{Map, json};

    fn player(team: i64, slot: i64) -> NetworkPlayer {
        NetworkPlayer {
            team,
            slot,
            alias: format!("p{slot}"),
            name: format!("p{slot}"),
            extra: Map::new(),
        }
    }

    fn item(code: i64) -> NetworkItem {
        NetworkItem {
            item: items::ITEM_ID_BASE + code,
            location: locations::LOCATION_ID_BASE + code,
            player: 1,
            flags: 0,
            extra: Map::new(),
        }
    }

    fn hub() -> SessionHub {
        SessionHub::new(Some("seed-a".to_string()), Some("Robo".to_string()), EventSender::new())
    }

    fn room_info(seed: &str) -> Command {
        Command::RoomInfo(RoomInfo {
            seed_name: seed.to_string(),
            extra: Map::new(),
        })
    }

    fn connected(players: Vec<NetworkPlayer>) -> Command {
        let mut slot_info = Map::new();
        slot_info.insert("1".to_string(), json!({"name": "p1", "game": "Chibi Robo"}));
        Command::Connected(Connected {
            team: 0,
            slot: 3,
            players,
            slot_info,
            extra: Map::new(),
        })
    }

    #[test]
    fn test_connected_is_narrowed_and_cached() {
        let hub = hub();
        hub.on_package(connected((1..=5).map(|s| player(0, s)).collect()));

        assert!(hub.drain_outbox().is_empty());
        let frame = hub.connected_frame().unwrap();
        let Command::Connected(cached) = decode(&frame).unwrap().remove(0) else {
            panic!("expected Connected");
        };
        assert_eq!(cached.players, vec![player(0, 3)]);
        assert!(cached.slot_info.is_empty());
        assert_eq!(hub.slot(), Some(3));
        assert_eq!(hub.generation(), 1);
    }

    #[test]
    fn test_room_update_players_stripped() {
        let hub = hub();
        hub.on_package(Command::RoomUpdate(RoomUpdate {
            players: Some(vec![player(0, 1), player(0, 2)]),
            extra: Map::new(),
        }));

        let frames = hub.drain_outbox();
        assert_eq!(frames.len(), 1);
        let value: serde_json::Value = serde_json::from_str(&frames[0]).unwrap();
        assert_eq!(value[0]["players"], json!([]));
    }

    #[test]
    fn test_index_zero_replaces_ledger() {
        let hub = hub();
        hub.on_package(Command::ReceivedItems(ReceivedItems {
            index: 0,
            items: vec![item(1), item(2), item(3)],
            extra: Map::new(),
        }));
        hub.on_package(Command::ReceivedItems(ReceivedItems {
            index: 3,
            items: vec![item(4)],
            extra: Map::new(),
        }));
        assert_eq!(hub.ledger().len(), 4);

        hub.on_package(Command::ReceivedItems(ReceivedItems {
            index: 0,
            items: vec![item(7), item(8)],
            extra: Map::new(),
        }));
        assert_eq!(hub.ledger().items(), vec![item(7), item(8)]);
        assert_eq!(hub.drain_outbox().len(), 3);
    }

    #[test]
    fn test_room_info_sets_seed_and_epoch() {
        let hub = hub();
        hub.on_package(room_info("seed-b"));
        assert_eq!(hub.seed_name().as_deref(), Some("seed-b"));
        assert_eq!(hub.ledger().snapshot().epoch, 0);
        assert!(hub.drain_outbox().is_empty());

        hub.on_package(room_info("seed-b"));
        assert_eq!(hub.ledger().snapshot().epoch, 0);

        hub.on_package(room_info("seed-c"));
        assert_eq!(hub.ledger().snapshot().epoch, 1);
    }

    #[test]
    fn test_awaiting_peer_gets_room_info_on_connect() {
        let hub = hub();
        assert_eq!(hub.on_peer_accepted(), None);

        hub.on_package(room_info("seed-a"));
        hub.on_package(Command::ReceivedItems(ReceivedItems {
            index: 0,
            items: vec![item(1)],
            extra: Map::new(),
        }));
        hub.drain_outbox();

        hub.on_package(connected(vec![player(0, 3)]));
        let frames = hub.drain_outbox();
        let names: Vec<_> = frames
            .iter()
            .map(|f| decode(f).unwrap()[0].name().to_string())
            .collect();
        assert_eq!(names, vec!["RoomInfo", "ReceivedItems"]);

        // A later peer gets the announcement directly
        assert!(hub.on_peer_accepted().is_some());
    }

    #[test]
    fn test_print_json_is_chat_not_queued() {
        let hub = hub();
        let mut events = hub.events().subscribe();
        hub.on_package(Command::PrintJson(PrintJson {
            data: vec![
                JsonMessagePart::text("Found "),
                JsonMessagePart {
                    text: (items::ITEM_ID_BASE + 8).to_string(),
                    kind: Some("item_id".to_string()),
                    extra: Map::new(),
                },
            ],
            kind: Some("ItemSend".to_string()),
            extra: Map::new(),
        }));

        assert!(hub.drain_outbox().is_empty());
        assert_eq!(
            events.try_recv().unwrap(),
            ClientEvent::Chat("Found Giga-Battery".to_string())
        );
    }

    #[test]
    fn test_unknown_commands_are_queued() {
        let hub = hub();
        hub.on_package(Command::Unknown(json!({"cmd": "Retrieved", "keys": {}})));
        assert_eq!(hub.drain_outbox().len(), 1);
    }

    #[test]
    fn test_outbox_is_bounded() {
        let hub = hub();
        for i in 0..OUTBOX_CAPACITY + 10 {
            hub.queue(Command::Unknown(json!({"cmd": "Bounced", "n": i})));
        }
        let frames = hub.drain_outbox();
        assert_eq!(frames.len(), OUTBOX_CAPACITY);
        assert!(frames[0].contains("\"n\":10"));
    }

    #[test]
    fn test_disconnect_clears_auth() {
        let hub = hub();
        hub.on_package(room_info("seed-a"));
        hub.on_package(connected(vec![player(0, 3)]));
        hub.on_disconnect();

        assert!(!hub.is_connected());
        assert_eq!(hub.auth(), None);
        assert_eq!(hub.slot(), None);
        assert_eq!(hub.connected_frame(), None);
        assert_eq!(hub.seed_name().as_deref(), Some("seed-a"));
    }
}
