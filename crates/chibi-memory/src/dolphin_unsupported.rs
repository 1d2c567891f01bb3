//! Placeholder Dolphin backend for platforms without procfs.

use crate::error::{MemoryError, Result};
use crate::process::GameProcess;

/// A handle onto a running Dolphin process. Hooking always fails here.
#[derive(Default)]
pub struct DolphinProcess;

impl DolphinProcess {
    /// Create an unhooked handle.
    pub fn new() -> Self {
        Self
    }

    /// Process id of the hooked emulator, if any.
    pub fn pid(&self) -> Option<u32> {
        None
    }
}

impl GameProcess for DolphinProcess {
    fn hook(&mut self) -> Result<()> {
        Err(MemoryError::Unsupported(
            "Dolphin memory access requires procfs",
        ))
    }

    fn unhook(&mut self) {}

    fn is_hooked(&self) -> bool {
        false
    }

    fn read_bytes(&self, _address: u32, _len: usize) -> Result<Vec<u8>> {
        Err(MemoryError::NotHooked)
    }

    fn write_bytes(&mut self, _address: u32, _data: &[u8]) -> Result<()> {
        Err(MemoryError::NotHooked)
    }
}
