//! The process handle abstraction shared by every backend.

use crate::error::{MemoryError, Result};

/// First address of emulated MEM1 as seen by the game.
pub const MEM1_START: u32 = 0x8000_0000;

/// Size of emulated MEM1 on a GameCube (24 MiB).
pub const MEM1_SIZE: u32 = 0x0180_0000;

/// A hookable handle onto the memory of an emulated game.
///
/// Implementations hold at most one live attachment. Every transfer fails
/// with [`MemoryError`] when no hook is held or the attachment has gone
/// stale, and partial transfers are reported as errors rather than
/// returned short.
pub trait GameProcess: Send {
    /// Attach to the emulator. Replaces any existing hook.
    fn hook(&mut self) -> Result<()>;

    /// Release the current hook, if any. Never fails.
    fn unhook(&mut self);

    /// Whether a hook is currently held.
    ///
    /// A held hook is not proof of liveness: the next transfer may still
    /// fail if the emulator exited.
    fn is_hooked(&self) -> bool;

    /// Read `len` bytes starting at an emulated address.
    fn read_bytes(&self, address: u32, len: usize) -> Result<Vec<u8>>;

    /// Write `data` starting at an emulated address.
    fn write_bytes(&mut self, address: u32, data: &[u8]) -> Result<()>;
}

impl<T: GameProcess + ?Sized> GameProcess for Box<T> {
    fn hook(&mut self) -> Result<()> {
        (**self).hook()
    }

    fn unhook(&mut self) {
        (**self).unhook();
    }

    fn is_hooked(&self) -> bool {
        (**self).is_hooked()
    }

    fn read_bytes(&self, address: u32, len: usize) -> Result<Vec<u8>> {
        (**self).read_bytes(address, len)
    }

    fn write_bytes(&mut self, address: u32, data: &[u8]) -> Result<()> {
        (**self).write_bytes(address, data)
    }
}

/// Validate that `address..address+len` lies inside MEM1 and return its
/// offset from [`MEM1_START`].
pub fn check_range(address: u32, len: usize) -> Result<u64> {
    let out_of_range = || MemoryError::OutOfRange { address, len };

    let offset = address.checked_sub(MEM1_START).ok_or_else(out_of_range)?;
    let len = u32::try_from(len).map_err(|_| out_of_range())?;
    let end = offset.checked_add(len).ok_or_else(out_of_range)?;
    if end > MEM1_SIZE {
        return Err(out_of_range());
    }

    Ok(u64::from(offset))
}
