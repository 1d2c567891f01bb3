//! Error types for memory access.

use thiserror::Error;

/// Result type for memory operations.
pub type Result<T> = std::result::Result<T, MemoryError>;

/// Errors raised while attaching to or transferring bytes with the
/// emulator process.
///
/// Any of these means the current handle can no longer be trusted; the
/// caller is expected to unhook and reattach later.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// An access was attempted without a live hook
    #[error("not hooked to an emulator process")]
    NotHooked,

    /// No running emulator process was found
    #[error("no running Dolphin process found")]
    ProcessNotFound,

    /// The emulator is running but has no emulated RAM mapped (no game booted)
    #[error("Dolphin process {pid} has no emulated RAM mapped")]
    RamNotFound {
        /// Process id of the emulator
        pid: u32,
    },

    /// The requested range lies outside emulated MEM1
    #[error("address range {address:#010x}+{len} is outside emulated RAM")]
    OutOfRange {
        /// First emulated address of the range
        address: u32,
        /// Length of the range in bytes
        len: usize,
    },

    /// Fewer bytes were transferred than requested
    #[error("short transfer at {address:#010x}: expected {expected} bytes, got {actual}")]
    ShortTransfer {
        /// Emulated address of the transfer
        address: u32,
        /// Requested byte count
        expected: usize,
        /// Byte count actually transferred
        actual: usize,
    },

    /// A value does not fit in the requested width
    #[error("value {value:#x} does not fit in {width} bytes")]
    ValueTooWide {
        /// Value that was to be written
        value: u32,
        /// Target width in bytes
        width: usize,
    },

    /// String at the address is not valid UTF-8
    #[error("string at {address:#010x} is not valid UTF-8")]
    InvalidString {
        /// Emulated address of the string
        address: u32,
    },

    /// Underlying OS error while touching the process
    #[error("process I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend is not available on this platform
    #[error("unsupported: {0}")]
    Unsupported(&'static str),
}
