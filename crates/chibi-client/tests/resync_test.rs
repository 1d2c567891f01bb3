//! Full item resends from the session while delivery is in progress.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chibi_client::inventory::MAILBOX_EMPTY;
use chibi_client::tables::items;
use chibi_client::{EventSender, InventorySynchronizer, MemoryLayout, SessionHub, SyncStep};
use chibi_memory::{GameProcess, SimulatedProcess};
use chibi_protocol::{Command, Connected, NetworkItem, NetworkPlayer, ReceivedItems};
use pretty_assertions::assert_eq;
use serde_json::Map;

const LAYOUT: MemoryLayout = MemoryLayout::GGTP01;

fn grant(name: &str, location: i64) -> NetworkItem {
    NetworkItem {
        item: items::by_name(name).unwrap().remote_id(),
        location,
        player: 1,
        flags: 0,
        extra: Map::new(),
    }
}

fn received(index: usize, items: Vec<NetworkItem>) -> Command {
    Command::ReceivedItems(ReceivedItems {
        index,
        items,
        extra: Map::new(),
    })
}

fn connected() -> Command {
    Command::Connected(Connected {
        team: 0,
        slot: 1,
        players: vec![NetworkPlayer {
            team: 0,
            slot: 1,
            alias: "Robo".to_string(),
            name: "Robo".to_string(),
            extra: Map::new(),
        }],
        slot_info: Map::new(),
        extra: Map::new(),
    })
}

/// A save in the kitchen with an empty mailbox, plus a hooked handle on it.
fn game_in_kitchen() -> (SimulatedProcess, SimulatedProcess) {
    let game = SimulatedProcess::new();
    game.poke_u32(LAYOUT.stage_id_address, 0x01);
    game.poke_u32(LAYOUT.mailbox_base, MAILBOX_EMPTY);
    let mut client = game.clone();
    client.hook().unwrap();
    (game, client)
}

#[test]
fn test_reconnect_resend_does_not_redeliver() {
    let (game, mut client) = game_in_kitchen();
    let hub = SessionHub::new(None, Some("Robo".to_string()), EventSender::new());
    let mut sync = InventorySynchronizer::new(LAYOUT);

    let first = vec![grant("Coin C 1", 2_326_532), grant("Junk C 2", 2_326_541)];
    hub.on_package(connected());
    hub.on_package(received(0, first.clone()));
    for _ in 0..2 {
        let step = sync.tick(&mut client, hub.ledger()).unwrap();
        assert!(matches!(step, SyncStep::Credited { .. }));
    }
    assert_eq!(game.peek_u32(LAYOUT.currency_address), 10);
    assert_eq!(game.peek_u32(LAYOUT.scrap_address), 100);

    // Session drops and comes back with the whole list again
    hub.on_disconnect();
    hub.on_package(connected());
    hub.on_package(received(0, first));
    for _ in 0..3 {
        assert_eq!(sync.tick(&mut client, hub.ledger()).unwrap(), SyncStep::Idle);
    }

    hub.on_package(received(2, vec![grant("Coin S 1", 2_326_540)]));
    let step = sync.tick(&mut client, hub.ledger()).unwrap();
    assert!(matches!(step, SyncStep::Credited { index: 2, .. }));

    assert_eq!(game.peek_u32(LAYOUT.currency_address), 60);
    assert_eq!(game.peek_u32(LAYOUT.scrap_address), 100);
    assert_eq!(game.peek_u16(LAYOUT.expected_index_address), 3);
}

#[test]
fn test_resends_racing_ticks_credit_once() {
    let (game, mut client) = game_in_kitchen();
    let hub = Arc::new(SessionHub::new(None, None, EventSender::new()));
    hub.on_package(connected());
    hub.on_package(received(0, vec![grant("Coin C 1", 2_326_532)]));

    let resender = {
        let hub = Arc::clone(&hub);
        std::thread::spawn(move || {
            for _ in 0..500 {
                hub.on_package(received(0, vec![grant("Coin C 1", 2_326_532)]));
            }
        })
    };

    let mut sync = InventorySynchronizer::new(LAYOUT);
    for _ in 0..500 {
        sync.tick(&mut client, hub.ledger()).unwrap();
    }
    resender.join().unwrap();
    for _ in 0..3 {
        sync.tick(&mut client, hub.ledger()).unwrap();
    }

    assert_eq!(game.peek_u32(LAYOUT.currency_address), 10);
    assert_eq!(game.peek_u16(LAYOUT.expected_index_address), 1);
}
