//! Dolphin backend for Unix.
//!
//! Dolphin backs emulated RAM with a shared memory file (`/dev/shm/dolphinmem.*`
//! or `/dolphin-emu.*` depending on version) mapped at offset 0. The mapping
//! spans 32 MiB even though MEM1 itself is 24 MiB. Emulated address `a`
//! lives at `mapping_start + (a - 0x8000_0000)` in the emulator's address
//! space.
//!
//! The emulator is located with `sysinfo`; transfers go through a
//! `process_memory` handle.

use std::fs;

use process_memory::{CopyAddress, Pid, ProcessHandle, PutAddress, TryIntoProcessHandle};
use sysinfo::System;
use tracing::{debug, info};

use crate::error::{MemoryError, Result};
use crate::process::{GameProcess, check_range};

/// Process name prefix shared by Dolphin builds (`dolphin-emu`,
/// `dolphin-emu-qt2`, `dolphin-emu-nogui`, ...).
const DOLPHIN_PROCESS_PREFIX: &str = "dolphin-emu";

/// Size of the shared mapping Dolphin uses for emulated RAM.
const RAM_MAPPING_SIZE: u64 = 0x0200_0000;

/// Path fragments identifying the emulated RAM mapping.
const RAM_MAPPING_MARKERS: &[&str] = &["dolphinmem", "dolphin-emu"];

struct Hook {
    pid: u32,
    handle: ProcessHandle,
    ram_start: u64,
}

impl Hook {
    fn host_address(&self, offset: u64) -> Result<usize> {
        usize::try_from(self.ram_start + offset).map_err(|_| {
            MemoryError::Unsupported("emulated RAM lies outside the host address space")
        })
    }
}

/// A handle onto a running Dolphin process.
#[derive(Default)]
pub struct DolphinProcess {
    hook: Option<Hook>,
}

impl DolphinProcess {
    /// Create an unhooked handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process id of the hooked emulator, if any.
    pub fn pid(&self) -> Option<u32> {
        self.hook.as_ref().map(|h| h.pid)
    }

    fn find_pid() -> Result<u32> {
        let system = System::new_all();

        // Threads show up as processes on Linux; only the group leader owns the mapping
        system
            .processes()
            .values()
            .filter(|process| process.thread_kind().is_none())
            .find(|process| is_dolphin_name(&process.name().to_string_lossy()))
            .map(|process| process.pid().as_u32())
            .ok_or(MemoryError::ProcessNotFound)
    }

    fn hooked(&self) -> Result<&Hook> {
        self.hook.as_ref().ok_or(MemoryError::NotHooked)
    }
}

impl GameProcess for DolphinProcess {
    fn hook(&mut self) -> Result<()> {
        self.hook = None;

        let pid = Self::find_pid()?;
        let maps = fs::read_to_string(format!("/proc/{pid}/maps"))?;
        let ram_start = find_ram_mapping(&maps).ok_or(MemoryError::RamNotFound { pid })?;
        let handle = Pid::try_from(pid)
            .map_err(|_| MemoryError::ProcessNotFound)?
            .try_into_process_handle()?;

        info!(pid, ram_start = %format!("{ram_start:#x}"), "hooked Dolphin");
        self.hook = Some(Hook {
            pid,
            handle,
            ram_start,
        });
        Ok(())
    }

    fn unhook(&mut self) {
        if let Some(hook) = self.hook.take() {
            debug!(pid = hook.pid, "unhooked Dolphin");
        }
    }

    fn is_hooked(&self) -> bool {
        self.hook.is_some()
    }

    fn read_bytes(&self, address: u32, len: usize) -> Result<Vec<u8>> {
        let hook = self.hooked()?;
        let offset = check_range(address, len)?;

        let mut buf = vec![0u8; len];
        hook.handle.copy_address(hook.host_address(offset)?, &mut buf)?;
        Ok(buf)
    }

    fn write_bytes(&mut self, address: u32, data: &[u8]) -> Result<()> {
        let hook = self.hooked()?;
        let offset = check_range(address, data.len())?;

        hook.handle.put_address(hook.host_address(offset)?, data)?;
        Ok(())
    }
}

fn is_dolphin_name(name: &str) -> bool {
    name.starts_with(DOLPHIN_PROCESS_PREFIX)
}

/// Find the start of the emulated RAM mapping in a `/proc/<pid>/maps` dump.
fn find_ram_mapping(maps: &str) -> Option<u64> {
    maps.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        let range = fields.next()?;
        let _perms = fields.next()?;
        let offset = fields.next()?;
        let path = fields.nth(2)?;

        if !RAM_MAPPING_MARKERS.iter().any(|m| path.contains(m)) {
            return None;
        }
        if u64::from_str_radix(offset, 16).ok()? != 0 {
            return None;
        }

        let (start, end) = range.split_once('-')?;
        let start = u64::from_str_radix(start, 16).ok()?;
        let end = u64::from_str_radix(end, 16).ok()?;
        (end.checked_sub(start)? == RAM_MAPPING_SIZE).then_some(start)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAPS: &str = "\
55d0c4a00000-55d0c4c00000 r--p 00000000 103:02 1234567 /usr/bin/dolphin-emu
7f1200000000-7f1202000000 rw-s 02000000 00:19 42 /dev/shm/dolphinmem.4242
7f3400000000-7f3402000000 rw-s 00000000 00:19 42 /dev/shm/dolphinmem.4242
7f5600000000-7f5600021000 rw-p 00000000 00:00 0
";

    #[test]
    fn test_find_ram_mapping_picks_offset_zero_32mib() {
        assert_eq!(find_ram_mapping(MAPS), Some(0x7f34_0000_0000));
    }

    #[test]
    fn test_find_ram_mapping_none_without_game() {
        let maps = "55d0c4a00000-55d0c4c00000 r--p 00000000 103:02 1234567 /usr/bin/dolphin-emu\n";
        assert_eq!(find_ram_mapping(maps), None);
    }

    #[test]
    fn test_find_ram_mapping_skips_inverted_range() {
        let maps = "\
7f3402000000-7f3400000000 rw-s 00000000 00:19 42 /dev/shm/dolphinmem.4242
7f5400000000-7f5402000000 rw-s 00000000 00:19 42 /dev/shm/dolphinmem.4242
";
        assert_eq!(find_ram_mapping(maps), Some(0x7f54_0000_0000));
    }

    #[test]
    fn test_is_dolphin_name() {
        assert!(is_dolphin_name("dolphin-emu"));
        assert!(is_dolphin_name("dolphin-emu-nogui"));
        assert!(is_dolphin_name("dolphin-emu-qt2"));
        assert!(!is_dolphin_name("dolphin"));
        assert!(!is_dolphin_name("bash"));
    }

    #[test]
    fn test_unhooked_access_fails() {
        let process = DolphinProcess::new();
        assert!(!process.is_hooked());
        assert!(matches!(
            process.read_bytes(0x8000_0000, 6),
            Err(MemoryError::NotHooked)
        ));
    }
}
