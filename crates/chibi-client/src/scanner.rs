//! Location check detection.

use std::collections::BTreeSet;

use chibi_memory::{GameProcess, MemoryExt};
use tracing::{debug, info};

use crate::inventory::MAILBOX_UNINITIALIZED;
use crate::layout::MemoryLayout;
use crate::tables::locations::{self, LocationData};

/// Locations already reported to the session. Only grows, except for an
/// explicit [`clear`](Self::clear) when the emulator is reattached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckedLocationSet(BTreeSet<&'static str>);

impl CheckedLocationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a location, returning whether it was new.
    pub fn insert(&mut self, name: &'static str) -> bool {
        self.0.insert(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_superset(&self, other: &Self) -> bool {
        self.0.is_superset(&other.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().copied()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Outcome of one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Locations that became checked this scan, in catalog order
    pub newly_checked: Vec<&'static LocationData>,
    /// The goal was reached for the first time
    pub goal_reached: bool,
}

impl ScanReport {
    pub fn is_empty(&self) -> bool {
        self.newly_checked.is_empty() && !self.goal_reached
    }

    /// Session ids of the newly checked locations.
    pub fn remote_ids(&self) -> Vec<i64> {
        self.newly_checked
            .iter()
            .filter_map(|l| l.remote_id())
            .collect()
    }
}

/// Samples the current stage's completion bitfield and diffs it against
/// what has already been reported.
#[derive(Debug)]
pub struct LocationScanner {
    layout: MemoryLayout,
    checked: CheckedLocationSet,
    goal_sent: bool,
}

impl LocationScanner {
    pub fn new(layout: MemoryLayout) -> Self {
        Self {
            layout,
            checked: CheckedLocationSet::new(),
            goal_sent: false,
        }
    }

    pub fn checked(&self) -> &CheckedLocationSet {
        &self.checked
    }

    pub const fn goal_sent(&self) -> bool {
        self.goal_sent
    }

    /// Forget reported locations so they are reported again after a
    /// reattach. The goal flag is kept for the lifetime of the client.
    pub fn reset(&mut self) {
        self.checked.clear();
    }

    /// Scan the current stage. `mailbox_address` is the slot the
    /// synchronizer is using; a zeroed slot means no save is loaded and the
    /// scan is skipped.
    pub fn scan<P>(&mut self, process: &P, mailbox_address: u32) -> chibi_memory::Result<ScanReport>
    where
        P: GameProcess + ?Sized,
    {
        let mut report = ScanReport::default();

        if process.read_u32(mailbox_address)? == MAILBOX_UNINITIALIZED {
            return Ok(report);
        }

        let area = process.read_u32(self.layout.stage_id_address)?;
        let candidates = locations::in_area(area);
        if candidates.is_empty() {
            return Ok(report);
        }

        let address = self.layout.location_flags(area);
        let bytes = process.read_bytes(address, 16)?;
        let mut raw = [0u8; 16];
        raw.copy_from_slice(&bytes);
        let bitfield = u128::from_be_bytes(raw);

        for &location in candidates {
            // Entering the boss room stands in for beating the boss
            if location.is_goal() {
                if !self.goal_sent {
                    info!(location = location.name, "goal reached");
                    self.goal_sent = true;
                    report.goal_reached = true;
                }
            } else if location.is_set(bitfield) && self.checked.insert(location.name) {
                report.newly_checked.push(location);
            }
        }

        if !report.newly_checked.is_empty() {
            debug!(area, count = report.newly_checked.len(), "new location checks");
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::MAILBOX_EMPTY;
    use crate::tables::locations::GOAL_AREA;
    use chibi_memory::SimulatedProcess;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const LAYOUT: MemoryLayout = MemoryLayout::GGTP01;

    fn game_in(area: u32) -> SimulatedProcess {
        let mut game = SimulatedProcess::new();
        game.poke_u32(LAYOUT.stage_id_address, area);
        game.poke_u32(LAYOUT.mailbox_base, MAILBOX_EMPTY);
        game.hook().unwrap();
        game
    }

    fn set_bitfield(game: &SimulatedProcess, area: u32, bits: u128) {
        game.poke(LAYOUT.location_flags(area), &bits.to_be_bytes());
    }

    #[test]
    fn test_reports_new_checks_once() {
        let game = game_in(0x02);
        let mut scanner = LocationScanner::new(LAYOUT);

        set_bitfield(&game, 0x02, 0b0101);
        let report = scanner.scan(&game, LAYOUT.mailbox_base).unwrap();
        let names: Vec<_> = report.newly_checked.iter().map(|l| l.name).collect();
        let expected: Vec<_> = [0, 2].iter().map(|&i| locations::in_area(0x02)[i].name).collect();
        assert_eq!(names, expected);
        assert_eq!(report.remote_ids().len(), 2);

        let report = scanner.scan(&game, LAYOUT.mailbox_base).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_skips_without_save() {
        let game = game_in(0x02);
        game.poke_u32(LAYOUT.mailbox_base, MAILBOX_UNINITIALIZED);
        set_bitfield(&game, 0x02, u128::MAX);

        let mut scanner = LocationScanner::new(LAYOUT);
        assert!(scanner.scan(&game, LAYOUT.mailbox_base).unwrap().is_empty());
        assert!(scanner.checked().is_empty());
    }

    #[test]
    fn test_only_current_area_is_read() {
        let game = game_in(0x01);
        set_bitfield(&game, 0x07, u128::MAX);

        let mut scanner = LocationScanner::new(LAYOUT);
        assert!(scanner.scan(&game, LAYOUT.mailbox_base).unwrap().is_empty());
    }

    #[test]
    fn test_goal_fires_exactly_once() {
        let game = game_in(GOAL_AREA);
        let mut scanner = LocationScanner::new(LAYOUT);

        let mut goals = 0;
        for _ in 0..101 {
            if scanner.scan(&game, LAYOUT.mailbox_base).unwrap().goal_reached {
                goals += 1;
            }
        }
        scanner.reset();
        for _ in 0..5 {
            if scanner.scan(&game, LAYOUT.mailbox_base).unwrap().goal_reached {
                goals += 1;
            }
        }
        assert_eq!(goals, 1);
        assert!(scanner.goal_sent());
    }

    #[test]
    fn test_goal_fires_on_entering_boss_room() {
        // No completion bits are needed, only the stage code
        let game = game_in(GOAL_AREA - 1);
        let mut scanner = LocationScanner::new(LAYOUT);
        assert!(!scanner.scan(&game, LAYOUT.mailbox_base).unwrap().goal_reached);

        game.poke_u32(LAYOUT.stage_id_address, GOAL_AREA);
        let report = scanner.scan(&game, LAYOUT.mailbox_base).unwrap();
        assert!(report.goal_reached);
        assert!(report.newly_checked.is_empty());
    }

    proptest! {
        #[test]
        fn checked_set_never_shrinks(
            snapshots in prop::collection::vec((prop::sample::select(vec![1u32, 2, 3, 4, 7, 0x0E]), any::<u128>()), 1..40)
        ) {
            let game = game_in(0x01);
            let mut scanner = LocationScanner::new(LAYOUT);
            let mut previous = CheckedLocationSet::new();

            for (area, bits) in snapshots {
                game.poke_u32(LAYOUT.stage_id_address, area);
                set_bitfield(&game, area, bits);
                scanner.scan(&game, LAYOUT.mailbox_base).unwrap();

                prop_assert!(scanner.checked().is_superset(&previous));
                previous = scanner.checked().clone();
            }
        }
    }
}
