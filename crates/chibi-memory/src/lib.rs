//! Typed access to the emulated memory of a running Dolphin process.
//!
//! Everything the sync client observes or changes in the game goes through
//! this crate. The layer knows nothing about the game itself:
//!
//! - [`GameProcess`]: attach/detach lifecycle plus raw byte transfers
//! - [`MemoryExt`]: big-endian fixed-width integers, NUL-terminated strings
//!   and byte-range comparisons on top of any [`GameProcess`]
//! - [`DolphinProcess`]: the production backend, reading MEM1 of a Dolphin
//!   instance located with `sysinfo` and accessed through `process_memory`
//! - `SimulatedProcess` (feature `test-support`): an in-memory backend
//!
//! Every failure is reported as a [`MemoryError`]. Callers are expected to
//! treat any error as loss of the process handle rather than retrying the
//! individual access.
//!
//! # Example
//!
//! ```no_run
//! use chibi_memory::{DolphinProcess, GameProcess, MemoryExt, Width};
//!
//! # fn main() -> chibi_memory::Result<()> {
//! let mut dolphin = DolphinProcess::new();
//! dolphin.hook()?;
//!
//! let game_id = dolphin.read_c_string(0x8000_0000, 6)?;
//! let stage = dolphin.read_fixed(0x8026_644C, Width::U32)?;
//! println!("{game_id} is in stage {stage}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod access;
pub mod error;
pub mod process;

#[cfg(unix)]
mod dolphin;
#[cfg(not(unix))]
#[path = "dolphin_unsupported.rs"]
mod dolphin;

#[cfg(any(test, feature = "test-support"))]
pub mod simulated;

pub use access::{MemoryExt, Width};
pub use dolphin::DolphinProcess;
pub use error::{MemoryError, Result};
pub use process::{GameProcess, MEM1_SIZE, MEM1_START, check_range};

#[cfg(any(test, feature = "test-support"))]
pub use simulated::SimulatedProcess;
