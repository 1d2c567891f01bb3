//! The emulator poll loop.
//!
//! One iteration checks the emulator connection, then (while a save is in
//! gameplay and the session is authenticated) delivers at most one item,
//! scans the current stage for new checks and publishes stage changes.
//! Memory faults anywhere in the iteration count as losing the emulator.

use std::sync::Arc;
use std::time::Duration;

use chibi_memory::{GameProcess, MemoryExt};
use chibi_protocol::{Bounce, CLIENT_GOAL, Command, LocationChecks, StatusUpdate};
use serde_json::{Map, Value};
use tracing::{debug, error, info};

use crate::area::{AreaNotifier, AreaObservation};
use crate::connection::{Connection, Tick};
use crate::events::{ClientEvent, EventSender};
use crate::inventory::{InventorySynchronizer, ItemLedger};
use crate::layout::MemoryLayout;
use crate::scanner::LocationScanner;
use crate::session::{SessionHub, SessionLink};
use crate::shutdown::ShutdownSignal;
use crate::status::StatusCell;
use crate::tables::areas;

/// Key of the stage name in the tracker `Bounce`.
pub const STAGE_NAME_KEY: &str = "chibi_robo_stage_name";

/// Loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Pause between healthy iterations
    pub interval: Duration,
    /// Pause after the emulator was lost or refused
    pub backoff: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(50),
            backoff: Duration::from_secs(5),
        }
    }
}

/// How long to wait before the next iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    /// Short interval; wakes early when items arrive
    Short,
    /// Full backoff; not interrupted by item arrivals
    Backoff,
}

pub struct PollLoop<P> {
    connection: Connection<P>,
    layout: MemoryLayout,
    settings: PollSettings,
    synchronizer: InventorySynchronizer,
    scanner: LocationScanner,
    notifier: AreaNotifier,
    hub: Arc<SessionHub>,
    link: Arc<dyn SessionLink>,
    events: EventSender,
}

impl<P: GameProcess> PollLoop<P> {
    pub fn new(
        process: P,
        layout: MemoryLayout,
        settings: PollSettings,
        status: Arc<StatusCell>,
        hub: Arc<SessionHub>,
        link: Arc<dyn SessionLink>,
    ) -> Self {
        let events = hub.events().clone();
        Self {
            connection: Connection::new(process, layout, status, events.clone()),
            layout,
            settings,
            synchronizer: InventorySynchronizer::new(layout),
            scanner: LocationScanner::new(layout),
            notifier: AreaNotifier::new(),
            hub,
            link,
            events,
        }
    }

    pub fn connection(&self) -> &Connection<P> {
        &self.connection
    }

    pub fn synchronizer(&self) -> &InventorySynchronizer {
        &self.synchronizer
    }

    pub fn scanner(&self) -> &LocationScanner {
        &self.scanner
    }

    /// Iterate until shutdown.
    pub async fn run(mut self, mut shutdown: ShutdownSignal) {
        info!(
            interval_ms = self.settings.interval.as_millis() as u64,
            backoff_secs = self.settings.backoff.as_secs(),
            "poll loop started"
        );

        while !shutdown.is_triggered() {
            let interrupted = match self.step() {
                Pace::Short => {
                    let ledger = Arc::clone(self.hub.ledger());
                    short_sleep(self.settings.interval, &ledger, &mut shutdown).await
                }
                Pace::Backoff => shutdown.sleep(self.settings.backoff).await,
            };
            if interrupted {
                break;
            }
        }

        info!("poll loop stopped");
    }

    /// Run one iteration and report how long to wait before the next.
    pub fn step(&mut self) -> Pace {
        let tick = self.connection.tick();
        if tick.needs_backoff() {
            self.forget_attach_state();
            return Pace::Backoff;
        }
        if tick == Tick::Attached {
            self.forget_attach_state();
        }

        match self.body() {
            Ok(()) => Pace::Short,
            Err(e) => {
                error!(error = %e, "memory fault in poll loop, treating as connection loss");
                self.connection.mark_lost();
                self.forget_attach_state();
                Pace::Backoff
            }
        }
    }

    fn forget_attach_state(&mut self) {
        self.synchronizer.reset_cursor();
        self.scanner.reset();
        self.notifier.reset();
    }

    fn body(&mut self) -> chibi_memory::Result<()> {
        let stage = self
            .connection
            .process()
            .read_u32(self.layout.stage_id_address)?;
        if !areas::is_gameplay(stage) {
            self.synchronizer.reset_cursor();
            return Ok(());
        }

        if !self.hub.is_connected() {
            return Ok(());
        }

        let step = self
            .synchronizer
            .tick(self.connection.process_mut(), self.hub.ledger())?;
        if let Some((item, index)) = step.applied() {
            self.events.emit(ClientEvent::ItemApplied {
                name: item.name,
                index,
            });
        }

        let report = self
            .scanner
            .scan(self.connection.process(), self.synchronizer.mailbox_address())?;
        if !report.newly_checked.is_empty() {
            info!(count = report.newly_checked.len(), "reporting checked locations");
            self.link.send(vec![Command::LocationChecks(LocationChecks {
                locations: report.remote_ids(),
                ..LocationChecks::default()
            })]);
            self.events.emit(ClientEvent::LocationsChecked {
                names: report.newly_checked.iter().map(|l| l.name).collect(),
            });
        }
        if report.goal_reached {
            self.link.send(vec![Command::StatusUpdate(StatusUpdate {
                status: CLIENT_GOAL,
                ..StatusUpdate::default()
            })]);
            self.events.emit(ClientEvent::GoalCompleted);
        }

        let observation = self.notifier.observe(stage);
        if let AreaObservation::Changed { from, to } = observation {
            self.events.emit(ClientEvent::AreaChanged { from, to });
        }
        if let (Some(name), Some(slot)) = (observation.published_name(), self.hub.slot()) {
            debug!(stage = name, "publishing stage");
            let mut data = Map::new();
            data.insert(STAGE_NAME_KEY.to_string(), Value::from(name));
            self.link.send(vec![Command::Bounce(Bounce {
                slots: vec![slot],
                data,
                ..Bounce::default()
            })]);
        }

        Ok(())
    }
}

/// Sleep the short interval, waking early for new items or shutdown.
/// Returns `true` when shutdown interrupted it.
async fn short_sleep(interval: Duration, ledger: &ItemLedger, shutdown: &mut ShutdownSignal) -> bool {
    tokio::select! {
        () = tokio::time::sleep(interval) => false,
        () = ledger.appended() => false,
        () = shutdown.wait() => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{GRANT_OFFSET, MAILBOX_EMPTY};
    use crate::status::ConnectionStatus;
    use crate::tables::items;
    use chibi_memory::SimulatedProcess;
    use chibi_protocol::{Connected, NetworkItem, NetworkPlayer};
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;

    const KITCHEN: u32 = 0x01;
    const FOYER: u32 = 0x02;

    #[derive(Default)]
    struct RecordingLink(Mutex<Vec<Command>>);

    impl SessionLink for RecordingLink {
        fn send(&self, commands: Vec<Command>) {
            self.0.lock().extend(commands);
        }
    }

    impl RecordingLink {
        fn names(&self) -> Vec<String> {
            self.0.lock().iter().map(|c| c.name().to_string()).collect()
        }
    }

    struct Harness {
        game: SimulatedProcess,
        hub: Arc<SessionHub>,
        link: Arc<RecordingLink>,
        status: Arc<StatusCell>,
        poll: PollLoop<SimulatedProcess>,
    }

    fn harness() -> Harness {
        let layout = MemoryLayout::GGTP01;
        let game = SimulatedProcess::new();
        game.poke(layout.game_id_address, layout.game_id);
        game.poke_u32(layout.stage_id_address, KITCHEN);
        game.poke_u32(layout.mailbox_base, MAILBOX_EMPTY);

        let hub = Arc::new(SessionHub::new(None, None, EventSender::new()));
        let link = Arc::new(RecordingLink::default());
        let status = Arc::new(StatusCell::new());
        let poll = PollLoop::new(
            game.clone(),
            layout,
            PollSettings::default(),
            Arc::clone(&status),
            Arc::clone(&hub),
            Arc::clone(&link) as Arc<dyn SessionLink>,
        );
        Harness {
            game,
            hub,
            link,
            status,
            poll,
        }
    }

    fn authenticate(hub: &SessionHub) {
        hub.on_package(Command::Connected(Connected {
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
        }));
    }

    #[test]
    fn test_attach_without_session_sends_nothing() {
        let mut h = harness();
        assert_eq!(h.poll.step(), Pace::Short);
        assert_eq!(h.status.get(), ConnectionStatus::Connected);
        assert!(h.link.names().is_empty());
    }

    #[test]
    fn test_stage_published_then_changes_reported() {
        let mut h = harness();
        authenticate(&h.hub);
        let mut events = h.hub.events().subscribe();

        h.poll.step();
        h.poll.step();
        h.game.poke_u32(MemoryLayout::GGTP01.stage_id_address, FOYER);
        h.poll.step();

        assert_eq!(h.link.names(), vec!["Bounce", "Bounce"]);
        let mut changes = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let ClientEvent::AreaChanged { from, to } = event {
                changes.push((from, to));
            }
        }
        assert_eq!(changes, vec![("Kitchen", "Foyer")]);
    }

    #[test]
    fn test_item_delivered_across_ticks() {
        let mut h = harness();
        authenticate(&h.hub);
        let battery = items::by_name("Giga-Battery").unwrap();
        h.hub.ledger().extend([NetworkItem {
            item: battery.remote_id(),
            location: 5,
            player: 2,
            flags: 0,
            extra: Map::new(),
        }]);

        let mailbox = MemoryLayout::GGTP01.mailbox_base;
        h.poll.step();
        assert_eq!(h.game.peek_u32(mailbox), u32::from(battery.game_id) + GRANT_OFFSET);

        // Game consumes the grant
        h.game.poke_u32(mailbox, u32::from(battery.game_id));
        h.poll.step();
        assert_eq!(h.game.peek_u16(MemoryLayout::GGTP01.expected_index_address), 1);
        assert_eq!(h.game.peek_u32(mailbox), MAILBOX_EMPTY);
    }

    #[test]
    fn test_memory_fault_is_connection_loss() {
        let mut h = harness();
        assert_eq!(h.poll.step(), Pace::Short);

        h.game.crash();
        assert_eq!(h.poll.step(), Pace::Backoff);
        assert_eq!(h.status.get(), ConnectionStatus::Lost);

        h.game.revive();
        assert_eq!(h.poll.step(), Pace::Short);
        assert_eq!(h.status.get(), ConnectionStatus::Connected);
    }

    #[test]
    fn test_outside_gameplay_skips_work() {
        let mut h = harness();
        authenticate(&h.hub);
        h.game.poke_u32(MemoryLayout::GGTP01.stage_id_address, 0x0A);

        assert_eq!(h.poll.step(), Pace::Short);
        assert!(h.link.names().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_on_shutdown() {
        let h = harness();
        let shutdown = crate::shutdown::Shutdown::new();
        let task = tokio::spawn(h.poll.run(shutdown.subscribe()));

        tokio::time::sleep(Duration::from_millis(500)).await;
        shutdown.trigger();
        task.await.unwrap();
        assert_eq!(h.status.get(), ConnectionStatus::Connected);
    }
}
