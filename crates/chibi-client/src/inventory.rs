//! Delivery of received items into game memory.
//!
//! The session's item list lives in an [`ItemLedger`] shared with the
//! session task. [`InventorySynchronizer`] walks that list one entry per
//! tick:
//!
//! - Currency and scrap are added straight to their counters.
//! - Everything else goes through the mailbox, a ring of 32-bit slots the
//!   game polls. A slot holds [`MAILBOX_EMPTY`] when free; the client writes
//!   `game_id + GRANT_OFFSET` to offer an item; the game rewrites the slot
//!   to the raw `game_id` once it has handed the item over, after which the
//!   client frees the slot and moves to the next one.
//!
//! A slot reading zero means no save file is loaded and nothing is touched.
//!
//! How many ledger entries the loaded save has already received is kept in
//! game memory at [`MemoryLayout::expected_index_address`] and read on every
//! tick. Progress therefore survives client restarts, and reloading an older
//! save makes the client resume from that save's own count.

use std::collections::HashSet;

use chibi_memory::{GameProcess, MemoryExt, Width};
use chibi_protocol::NetworkItem;
use parking_lot::RwLock;
use tokio::sync::Notify;
use tracing::{debug, info, warn};

use crate::layout::MemoryLayout;
use crate::tables::items::{self, ItemCategory, ItemData};
use crate::tables::areas;

/// Slot value before the game has initialized the mailbox.
pub const MAILBOX_UNINITIALIZED: u32 = 0x0000_0000;

/// Slot value of a free mailbox slot.
pub const MAILBOX_EMPTY: u32 = 0x0000_FFFF;

/// Added to an item's game id while the grant is pending.
pub const GRANT_OFFSET: u32 = 0x0001_0000;

#[derive(Debug, Default)]
struct LedgerState {
    items: Vec<NetworkItem>,
    epoch: u64,
}

/// Ordered list of items the session has granted this player.
///
/// Appended to by the session task, read by the synchronizer. The epoch
/// changes when the list starts belonging to a different seed, which
/// invalidates the synchronizer's progress.
#[derive(Debug, Default)]
pub struct ItemLedger {
    state: RwLock<LedgerState>,
    notify: Notify,
}

/// A consistent copy of the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub epoch: u64,
    pub items: Vec<NetworkItem>,
}

impl ItemLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a complete list, as sent by the session after a reconnect.
    pub fn replace(&self, items: impl IntoIterator<Item = NetworkItem>) {
        {
            let mut state = self.state.write();
            state.items.clear();
            state.items.extend(items);
        }
        self.notify.notify_waiters();
    }

    /// Append entries in arrival order and wake the poll loop.
    pub fn extend(&self, items: impl IntoIterator<Item = NetworkItem>) {
        self.state.write().items.extend(items);
        self.notify.notify_waiters();
    }

    /// Drop every entry and start a new epoch.
    pub fn start_epoch(&self) {
        let mut state = self.state.write();
        state.items.clear();
        state.epoch += 1;
    }

    pub fn len(&self) -> usize {
        self.state.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn items(&self) -> Vec<NetworkItem> {
        self.state.read().items.clone()
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        let state = self.state.read();
        LedgerSnapshot {
            epoch: state.epoch,
            items: state.items.clone(),
        }
    }

    /// Resolves the next time entries are appended.
    pub async fn appended(&self) {
        self.notify.notified().await;
    }
}

/// Entries in order, with exact repeats of location-bound grants removed.
///
/// A grant found at a real location can only be received once; the session
/// repeats it after reconnects. Grants with a negative location (server or
/// admin grants) may legitimately repeat and are kept.
pub fn unique_entries(items: &[NetworkItem]) -> Vec<NetworkItem> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| item.location < 0 || seen.insert(item.key()))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    index: usize,
    item: &'static ItemData,
    encoded: u32,
    raw: u32,
}

/// What a single [`InventorySynchronizer::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStep {
    /// Not in a gameplay stage; cursor was reset
    NotInGame,
    /// No save loaded; nothing touched
    NoSave,
    /// Everything in the ledger has been applied
    Idle,
    /// Added a currency or scrap amount to its counter
    Credited {
        item: &'static ItemData,
        index: usize,
    },
    /// Wrote a pending grant into the mailbox
    Offered {
        item: &'static ItemData,
        index: usize,
    },
    /// Found our pending grant already in the mailbox and took ownership
    Adopted {
        item: &'static ItemData,
        index: usize,
    },
    /// The game consumed the pending grant; slot freed and cursor advanced
    Delivered {
        item: &'static ItemData,
        index: usize,
    },
    /// Pending grant not consumed yet
    Waiting,
    /// Mailbox holds something else; try again next tick
    Deferred,
    /// Pending grant disappeared from the mailbox (save reloaded)
    Vanished,
    /// Entry names an item this client does not know; skipped
    UnknownItem { item: i64 },
}

impl SyncStep {
    /// Item and ledger index when an entry was fully applied this tick.
    pub const fn applied(self) -> Option<(&'static ItemData, usize)> {
        match self {
            Self::Credited { item, index } | Self::Delivered { item, index } => {
                Some((item, index))
            }
            _ => None,
        }
    }
}

/// Applies ledger entries to game memory, one step per tick.
#[derive(Debug)]
pub struct InventorySynchronizer {
    layout: MemoryLayout,
    cursor: u32,
    in_flight: Option<InFlight>,
    epoch: u64,
}

impl InventorySynchronizer {
    pub fn new(layout: MemoryLayout) -> Self {
        Self {
            layout,
            cursor: 0,
            in_flight: None,
            epoch: 0,
        }
    }

    /// Number of unique ledger entries the loaded save has received.
    pub fn expected_index<P>(&self, process: &P) -> chibi_memory::Result<usize>
    where
        P: GameProcess + ?Sized,
    {
        process
            .read_u16(self.layout.expected_index_address)
            .map(usize::from)
    }

    /// Address of the mailbox slot currently in use.
    pub const fn mailbox_address(&self) -> u32 {
        self.layout.mailbox_slot(self.cursor)
    }

    /// Return to the first mailbox slot and forget any pending grant.
    ///
    /// Required whenever the game leaves gameplay or the process is lost,
    /// since the mailbox is meaningless outside a loaded save.
    pub fn reset_cursor(&mut self) {
        if self.cursor != 0 || self.in_flight.is_some() {
            debug!(cursor = self.cursor, "mailbox cursor reset");
        }
        self.cursor = 0;
        self.in_flight = None;
    }

    /// Perform at most one delivery step.
    pub fn tick<P>(&mut self, process: &mut P, ledger: &ItemLedger) -> chibi_memory::Result<SyncStep>
    where
        P: GameProcess + ?Sized,
    {
        let stage = process.read_u32(self.layout.stage_id_address)?;
        if !areas::is_gameplay(stage) {
            self.reset_cursor();
            return Ok(SyncStep::NotInGame);
        }

        let snapshot = ledger.snapshot();
        if snapshot.epoch != self.epoch {
            info!(epoch = snapshot.epoch, "item list belongs to a new seed");
            self.epoch = snapshot.epoch;
            self.in_flight = None;
        }

        let slot_address = self.mailbox_address();
        let slot = process.read_u32(slot_address)?;

        if let Some(grant) = self.in_flight {
            if slot == grant.encoded {
                return Ok(SyncStep::Waiting);
            }
            if slot == grant.raw {
                process.write_u32(slot_address, MAILBOX_EMPTY)?;
                self.cursor = (self.cursor + 1) % self.layout.mailbox_slots;
                self.record_applied(process, grant.index)?;
                self.in_flight = None;
                info!(item = grant.item.name, index = grant.index, "item delivered");
                return Ok(SyncStep::Delivered {
                    item: grant.item,
                    index: grant.index,
                });
            }
            warn!(
                item = grant.item.name,
                slot = %format!("{slot:#010x}"),
                "pending grant vanished from mailbox"
            );
            self.in_flight = None;
            return Ok(SyncStep::Vanished);
        }

        if slot == MAILBOX_UNINITIALIZED {
            return Ok(SyncStep::NoSave);
        }

        // A list shorter than the save's count is a session resync still
        // catching up, never a reason to deliver again
        let index = self.expected_index(process)?;
        let entries = unique_entries(&snapshot.items);
        let Some(entry) = entries.get(index) else {
            return Ok(SyncStep::Idle);
        };

        let Some(item) = items::by_remote_id(entry.item) else {
            warn!(item = entry.item, index, "skipping unknown item");
            self.record_applied(process, index)?;
            return Ok(SyncStep::UnknownItem { item: entry.item });
        };

        match item.category {
            ItemCategory::Currency(amount) => {
                self.credit(process, self.layout.currency_address, amount)?;
                self.record_applied(process, index)?;
                Ok(SyncStep::Credited { item, index })
            }
            ItemCategory::Scrap(amount) => {
                self.credit(process, self.layout.scrap_address, amount)?;
                self.record_applied(process, index)?;
                Ok(SyncStep::Credited { item, index })
            }
            ItemCategory::Grant => {
                let raw = u32::from(item.game_id);
                let grant = InFlight {
                    index,
                    item,
                    encoded: raw + GRANT_OFFSET,
                    raw,
                };

                if slot == grant.encoded {
                    self.in_flight = Some(grant);
                    Ok(SyncStep::Adopted { item, index })
                } else if slot == MAILBOX_EMPTY {
                    process.write_u32(slot_address, grant.encoded)?;
                    self.in_flight = Some(grant);
                    debug!(item = item.name, index, "grant offered");
                    Ok(SyncStep::Offered { item, index })
                } else {
                    Ok(SyncStep::Deferred)
                }
            }
        }
    }

    fn record_applied<P>(&self, process: &mut P, index: usize) -> chibi_memory::Result<()>
    where
        P: GameProcess + ?Sized,
    {
        let next = u32::try_from(index + 1).unwrap_or(u32::MAX).min(Width::U16.max_value());
        process.write_fixed(self.layout.expected_index_address, Width::U16, next)
    }

    fn credit<P>(&self, process: &mut P, address: u32, amount: u32) -> chibi_memory::Result<()>
    where
        P: GameProcess + ?Sized,
    {
        let current = process.read_u32(address)?;
        process.write_u32(address, current.saturating_add(amount))
    }
}
