//! Attach/detach lifecycle for the emulator process.

use std::sync::Arc;

use chibi_memory::{GameProcess, MemoryExt};
use tracing::{debug, info, warn};

use crate::events::{ClientEvent, EventSender};
use crate::layout::MemoryLayout;
use crate::status::{ConnectionStatus, StatusCell};

/// Result of one [`Connection::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Was connected and still is
    Healthy,
    /// Just attached to the right game; per-attach caches must be reset
    Attached,
    /// Lost the process or failed to attach
    Lost,
    /// Attached, but the wrong game is running
    Refused,
}

impl Tick {
    /// Whether the caller should wait the backoff interval before retrying.
    pub const fn needs_backoff(self) -> bool {
        matches!(self, Self::Lost | Self::Refused)
    }

    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Healthy | Self::Attached)
    }
}

/// Owns the process handle and the connection status.
pub struct Connection<P> {
    process: P,
    layout: MemoryLayout,
    status: Arc<StatusCell>,
    events: EventSender,
}

impl<P: GameProcess> Connection<P> {
    pub fn new(process: P, layout: MemoryLayout, status: Arc<StatusCell>, events: EventSender) -> Self {
        Self {
            process,
            layout,
            status,
            events,
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status.get()
    }

    pub fn process(&self) -> &P {
        &self.process
    }

    pub fn process_mut(&mut self) -> &mut P {
        &mut self.process
    }

    /// Verify or establish the connection. Never fails; the outcome is
    /// reflected in the status cell and the returned [`Tick`].
    pub fn tick(&mut self) -> Tick {
        if self.status.get() == ConnectionStatus::Connected {
            return match self.signature_matches() {
                Ok(true) => Tick::Healthy,
                Ok(false) => {
                    warn!("game signature changed, treating as connection loss");
                    self.mark_lost();
                    Tick::Lost
                }
                Err(e) => {
                    warn!(error = %e, "lost Dolphin process");
                    self.mark_lost();
                    Tick::Lost
                }
            };
        }

        if let Err(e) = self.process.hook() {
            debug!(error = %e, "attach attempt failed");
            self.mark_lost();
            return Tick::Lost;
        }

        match self.signature_matches() {
            Ok(true) => {
                info!("{}", ConnectionStatus::Connected.message());
                self.set_status(ConnectionStatus::Connected);
                Tick::Attached
            }
            Ok(false) => {
                self.process.unhook();
                self.set_status(ConnectionStatus::RefusedWrongGame);
                Tick::Refused
            }
            Err(e) => {
                debug!(error = %e, "signature read failed after attach");
                self.mark_lost();
                Tick::Lost
            }
        }
    }

    /// Drop the hook and record the loss.
    pub fn mark_lost(&mut self) {
        self.process.unhook();
        self.set_status(ConnectionStatus::Lost);
    }

    fn signature_matches(&self) -> chibi_memory::Result<bool> {
        self.process
            .bytes_equal(self.layout.game_id_address, self.layout.game_id)
    }

    fn set_status(&self, status: ConnectionStatus) {
        let previous = self.status.set(status);
        if previous != status {
            if status != ConnectionStatus::Connected {
                warn!("{}", status.message());
            }
            self.events.emit(ClientEvent::StatusChanged {
                from: previous,
                to: status,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chibi_memory::SimulatedProcess;

    fn connection(process: &SimulatedProcess) -> Connection<SimulatedProcess> {
        Connection::new(
            process.clone(),
            MemoryLayout::GGTP01,
            Arc::new(StatusCell::new()),
            EventSender::new(),
        )
    }

    #[test]
    fn test_attach_to_correct_game() {
        let game = SimulatedProcess::new();
        game.poke(0x8000_0000, b"GGTP01");
        let mut conn = connection(&game);

        assert_eq!(conn.tick(), Tick::Attached);
        assert_eq!(conn.status(), ConnectionStatus::Connected);
        assert_eq!(conn.tick(), Tick::Healthy);
        assert_eq!(game.hook_attempts(), 1);
    }

    #[test]
    fn test_wrong_game_is_refused_and_unhooked() {
        let game = SimulatedProcess::new();
        game.poke(0x8000_0000, b"GALE01");
        let mut conn = connection(&game);

        assert_eq!(conn.tick(), Tick::Refused);
        assert_eq!(conn.status(), ConnectionStatus::RefusedWrongGame);
        assert!(!conn.process().is_hooked());
    }

    #[test]
    fn test_no_process_is_lost() {
        let game = SimulatedProcess::new();
        game.set_hookable(false);
        let mut conn = connection(&game);

        let tick = conn.tick();
        assert_eq!(tick, Tick::Lost);
        assert!(tick.needs_backoff());
        assert_eq!(conn.status(), ConnectionStatus::Lost);
    }

    #[test]
    fn test_crash_while_connected() {
        let game = SimulatedProcess::new();
        game.poke(0x8000_0000, b"GGTP01");
        let mut conn = connection(&game);
        let mut events = conn.events.subscribe();
        assert_eq!(conn.tick(), Tick::Attached);

        game.crash();
        assert_eq!(conn.tick(), Tick::Lost);
        assert_eq!(conn.status(), ConnectionStatus::Lost);
        assert!(!conn.process().is_hooked());

        assert_eq!(
            events.try_recv().unwrap(),
            ClientEvent::StatusChanged {
                from: ConnectionStatus::Initial,
                to: ConnectionStatus::Connected
            }
        );
        assert_eq!(
            events.try_recv().unwrap(),
            ClientEvent::StatusChanged {
                from: ConnectionStatus::Connected,
                to: ConnectionStatus::Lost
            }
        );
    }

    #[test]
    fn test_game_swapped_underneath() {
        let game = SimulatedProcess::new();
        game.poke(0x8000_0000, b"GGTP01");
        let mut conn = connection(&game);
        assert_eq!(conn.tick(), Tick::Attached);

        game.poke(0x8000_0000, b"GZLE01");
        assert_eq!(conn.tick(), Tick::Lost);

        // Next attempt reattaches and sees the other game
        assert_eq!(conn.tick(), Tick::Refused);
    }
}
