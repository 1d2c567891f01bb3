//! In-memory backend for tests.
//!
//! `SimulatedProcess` is cheaply cloneable; clones share the same emulated
//! RAM and switches, so a test can keep one handle to script the "game"
//! while the code under test owns another.

use std::collections::BTreeMap;
use std::sync::Arc;

use byteorder::{BigEndian, ByteOrder};
use parking_lot::Mutex;

use crate::error::{MemoryError, Result};
use crate::process::{GameProcess, check_range};

#[derive(Debug)]
struct SimState {
    ram: BTreeMap<u32, u8>,
    hookable: bool,
    alive: bool,
    hook_attempts: usize,
    writes: Vec<(u32, Vec<u8>)>,
}

/// A scriptable stand-in for an emulator process.
///
/// Unwritten bytes read as zero. Reads and writes made through the
/// [`GameProcess`] interface honor the hook and liveness switches; the
/// `poke`/`peek` helpers bypass them and are not recorded in the write log.
#[derive(Debug, Clone)]
pub struct SimulatedProcess {
    state: Arc<Mutex<SimState>>,
    hooked: bool,
}

impl Default for SimulatedProcess {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedProcess {
    /// Create a hookable process with zeroed RAM.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                ram: BTreeMap::new(),
                hookable: true,
                alive: true,
                hook_attempts: 0,
                writes: Vec::new(),
            })),
            hooked: false,
        }
    }

    /// Control whether future `hook()` calls succeed.
    pub fn set_hookable(&self, hookable: bool) {
        self.state.lock().hookable = hookable;
    }

    /// Make every transfer fail until [`revive`](Self::revive) is called.
    pub fn crash(&self) {
        self.state.lock().alive = false;
    }

    /// Undo [`crash`](Self::crash).
    pub fn revive(&self) {
        self.state.lock().alive = true;
    }

    /// Write bytes directly, as the game itself would.
    pub fn poke(&self, address: u32, data: &[u8]) {
        let mut state = self.state.lock();
        for (addr, byte) in (address..).zip(data) {
            state.ram.insert(addr, *byte);
        }
    }

    /// Write a big-endian `u32` directly.
    pub fn poke_u32(&self, address: u32, value: u32) {
        self.poke(address, &value.to_be_bytes());
    }

    /// Write a big-endian `u16` directly.
    pub fn poke_u16(&self, address: u32, value: u16) {
        self.poke(address, &value.to_be_bytes());
    }

    /// Read bytes directly.
    pub fn peek(&self, address: u32, len: usize) -> Vec<u8> {
        let state = self.state.lock();
        (address..)
            .take(len)
            .map(|addr| state.ram.get(&addr).copied().unwrap_or(0))
            .collect()
    }

    /// Read a big-endian `u32` directly.
    pub fn peek_u32(&self, address: u32) -> u32 {
        BigEndian::read_u32(&self.peek(address, 4))
    }

    /// Read a big-endian `u16` directly.
    pub fn peek_u16(&self, address: u32) -> u16 {
        BigEndian::read_u16(&self.peek(address, 2))
    }

    /// Number of `hook()` calls made so far, successful or not.
    pub fn hook_attempts(&self) -> usize {
        self.state.lock().hook_attempts
    }

    /// Every write made through [`GameProcess::write_bytes`], in order.
    pub fn write_log(&self) -> Vec<(u32, Vec<u8>)> {
        self.state.lock().writes.clone()
    }

    /// Forget recorded writes.
    pub fn clear_write_log(&self) {
        self.state.lock().writes.clear();
    }

    fn live(&self) -> Result<()> {
        if !self.hooked {
            return Err(MemoryError::NotHooked);
        }
        if !self.state.lock().alive {
            return Err(MemoryError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "simulated process exited",
            )));
        }
        Ok(())
    }
}

impl GameProcess for SimulatedProcess {
    fn hook(&mut self) -> Result<()> {
        let mut state = self.state.lock();
        state.hook_attempts += 1;
        if !state.hookable || !state.alive {
            self.hooked = false;
            return Err(MemoryError::ProcessNotFound);
        }
        self.hooked = true;
        Ok(())
    }

    fn unhook(&mut self) {
        self.hooked = false;
    }

    fn is_hooked(&self) -> bool {
        self.hooked
    }

    fn read_bytes(&self, address: u32, len: usize) -> Result<Vec<u8>> {
        self.live()?;
        check_range(address, len)?;
        Ok(self.peek(address, len))
    }

    fn write_bytes(&mut self, address: u32, data: &[u8]) -> Result<()> {
        self.live()?;
        check_range(address, data.len())?;
        self.poke(address, data);
        self.state.lock().writes.push((address, data.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clones_share_ram() {
        let mut code = SimulatedProcess::new();
        let game = code.clone();
        code.hook().unwrap();

        game.poke_u32(0x8039_6576, 0xFFFF);
        assert_eq!(code.read_bytes(0x8039_6576, 4).unwrap(), vec![0, 0, 0xFF, 0xFF]);

        code.write_bytes(0x8039_6576, &[0, 1, 0, 0x10]).unwrap();
        assert_eq!(game.peek_u32(0x8039_6576), 0x0001_0010);
        assert_eq!(game.write_log(), vec![(0x8039_6576, vec![0, 1, 0, 0x10])]);
    }

    #[test]
    fn test_crash_breaks_hooked_transfers() {
        let mut process = SimulatedProcess::new();
        process.hook().unwrap();
        process.crash();

        assert!(matches!(
            process.read_bytes(0x8000_0000, 1),
            Err(MemoryError::Io(_))
        ));
        assert!(process.hook().is_err());
        assert!(!process.is_hooked());

        process.revive();
        process.hook().unwrap();
        assert_eq!(process.hook_attempts(), 3);
    }

    #[test]
    fn test_unhookable_process() {
        let mut process = SimulatedProcess::new();
        process.set_hookable(false);
        assert!(matches!(process.hook(), Err(MemoryError::ProcessNotFound)));
        assert!(!process.is_hooked());
    }
}
