//! Emulator connection status shared between the poll loop and displays.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Where the client stands with the emulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ConnectionStatus {
    /// No attach attempted yet
    Initial = 0,
    /// Hooked and the running game is ours
    Connected = 1,
    /// Hook failed or was lost
    Lost = 2,
    /// Hooked, but a different game is running
    RefusedWrongGame = 3,
}

impl ConnectionStatus {
    /// Message shown to the player for this status.
    pub const fn message(self) -> &'static str {
        match self {
            Self::Initial => "Dolphin connection has not been initiated.",
            Self::Connected => "Dolphin connected successfully.",
            Self::Lost => {
                "Dolphin connection was lost. Please restart your emulator and make sure Chibi Robo is running."
            }
            Self::RefusedWrongGame => {
                "Dolphin failed to connect. Please load a randomized ROM for Chibi Robo. Trying again in 5 seconds..."
            }
        }
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Connected,
            2 => Self::Lost,
            3 => Self::RefusedWrongGame,
            _ => Self::Initial,
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Lock-free holder for the current [`ConnectionStatus`].
///
/// Written only by the poll loop; read from anywhere.
#[derive(Debug)]
pub struct StatusCell(AtomicU8);

impl StatusCell {
    pub const fn new() -> Self {
        Self(AtomicU8::new(ConnectionStatus::Initial as u8))
    }

    pub fn get(&self) -> ConnectionStatus {
        ConnectionStatus::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Store a new status, returning the previous one.
    pub fn set(&self, status: ConnectionStatus) -> ConnectionStatus {
        ConnectionStatus::from_u8(self.0.swap(status as u8, Ordering::AcqRel))
    }
}

impl Default for StatusCell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_cell_roundtrip() {
        let cell = StatusCell::new();
        assert_eq!(cell.get(), ConnectionStatus::Initial);

        for status in [
            ConnectionStatus::Connected,
            ConnectionStatus::Lost,
            ConnectionStatus::RefusedWrongGame,
        ] {
            cell.set(status);
            assert_eq!(cell.get(), status);
        }
        assert_eq!(cell.set(ConnectionStatus::Initial), ConnectionStatus::RefusedWrongGame);
    }

    #[test]
    fn test_messages_mention_dolphin() {
        assert!(ConnectionStatus::Lost.to_string().starts_with("Dolphin connection was lost"));
        assert!(ConnectionStatus::RefusedWrongGame.message().contains("randomized ROM"));
    }
}
