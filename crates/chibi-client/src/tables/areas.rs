//! Stage codes and their names.

/// Name reported for a stage code missing from the table.
pub const UNKNOWN_AREA: &str = "Unknown Area";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Area {
    pub code: u32,
    pub name: &'static str,
    /// False for menus, credits and other screens without a save in play
    pub gameplay: bool,
}

const fn area(code: u32, name: &'static str, gameplay: bool) -> Area {
    Area {
        code,
        name,
        gameplay,
    }
}

pub static AREAS: &[Area] = &[
    area(0x00, "Debug", false),
    area(0x01, "Kitchen", true),
    area(0x02, "Foyer", true),
    area(0x03, "Basement", true),
    area(0x04, "Jenny's Room", true),
    area(0x05, "Chibi House", true),
    area(0x06, "Bedroom", true),
    area(0x07, "Living Room", true),
    area(0x09, "Backyard", true),
    area(0x0A, "Staff Credits", false),
    area(0x0B, "Drain", true),
    area(0x0D, "Chibi-Manual", false),
    area(0x0E, "Menu", false),
    area(0x10, "UFO", true),
    area(0x12, "Bedroom (Past)", true),
    area(0x16, "Mother Spider's Room", true),
];

pub fn lookup(code: u32) -> Option<&'static Area> {
    AREAS.iter().find(|a| a.code == code)
}

/// Canonical name of a stage, or [`UNKNOWN_AREA`].
pub fn name_of(code: u32) -> &'static str {
    lookup(code).map_or(UNKNOWN_AREA, |a| a.name)
}

/// Whether items may be delivered and locations scanned in this stage.
///
/// Unrecognized codes count as non-gameplay.
pub fn is_gameplay(code: u32) -> bool {
    lookup(code).is_some_and(|a| a.gameplay)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(name_of(1), "Kitchen");
        assert_eq!(name_of(2), "Foyer");
        assert_eq!(name_of(3), "Basement");
        assert_eq!(name_of(0x08), UNKNOWN_AREA);
        assert_eq!(name_of(0xDEAD_BEEF), UNKNOWN_AREA);
    }

    #[test]
    fn test_gameplay_areas() {
        assert!(is_gameplay(0x07));
        assert!(is_gameplay(0x16));
        for code in [0x00, 0x0A, 0x0D, 0x0E, 0x08, 0xFF] {
            assert!(!is_gameplay(code), "{code:#x} should not be gameplay");
        }
    }
}
