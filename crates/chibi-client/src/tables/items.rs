//! Item catalog.
//!
//! `code` is the stable per-world item code; the session identifies items by
//! [`ItemData::remote_id`]. `game_id` is the id the game itself uses for the
//! item and is what gets written into the mailbox.

use std::collections::HashMap;
use std::sync::LazyLock;

use self::Classification::{Filler, Progression, Useful};
use self::ItemCategory::{Currency, Grant, Scrap};

/// Offset added to an item code to form its session id.
pub const ITEM_ID_BASE: i64 = 2_322_432;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Progression,
    Useful,
    Filler,
}

/// How a received item reaches the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemCategory {
    /// Delivered one at a time through the mailbox
    Grant,
    /// Added to the moolah counter
    Currency(u32),
    /// Added to the scrap counter
    Scrap(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemData {
    pub name: &'static str,
    pub code: u32,
    pub game_id: u8,
    pub classification: Classification,
    pub category: ItemCategory,
}

impl ItemData {
    /// Session id of this item.
    pub const fn remote_id(&self) -> i64 {
        ITEM_ID_BASE + self.code as i64
    }
}

const fn item(
    name: &'static str,
    code: u32,
    game_id: u8,
    classification: Classification,
    category: ItemCategory,
) -> ItemData {
    ItemData {
        name,
        code,
        game_id,
        classification,
        category,
    }
}

/// Every item, in code order.
pub static ITEMS: &[ItemData] = &[
    item("Toothbrush Chibi-Gear", 0, 0x10, Progression, Grant),
    item("Spoon Chibi-Gear", 1, 0x15, Progression, Grant),
    item("Mug Chibi-Gear", 2, 0x16, Progression, Grant),
    item("Chibi-Blaster Chibi-Gear", 3, 0x83, Progression, Grant),
    item("Squirter Chibi-Gear", 4, 0x38, Progression, Grant),
    item("Range Chip", 5, 0x06, Progression, Grant),
    item("Alien Ear Chip", 6, 0x3e, Progression, Grant),
    item("Charge Chip", 7, 0x35, Progression, Grant),
    item("Giga-Battery", 8, 0x08, Progression, Grant),
    item("Giga-Charger", 9, 0x30, Progression, Grant),
    item("Left Leg", 10, 0x6d, Progression, Grant),
    item("Toy Receipt", 11, 0x37, Progression, Grant),
    item("Wedding Band", 12, 0x7a, Progression, Grant),
    item("C Battery", 13, 0x3b, Useful, Grant),
    item("AA Battery", 14, 0x3c, Useful, Grant),
    item("D Battery", 15, 0x3a, Useful, Grant),
    item("Red Shoe", 16, 0x3d, Useful, Grant),
    item("Green Crayon", 17, 0x96, Useful, Grant),
    item("Red Crayon", 18, 0x93, Useful, Grant),
    item("Purple Crayon", 19, 0x97, Useful, Grant),
    item("Space Scramber", 20, 0x6b, Useful, Grant),
    item("Chibi-Battery", 21, 0x9e, Useful, Grant),
    item("Dinahs Teeth", 22, 0x58, Useful, Grant),
    item("Scurvy Splinter", 23, 0x72, Useful, Grant),
    item("Red Brick", 24, 0x7a, Useful, Grant),
    item("Chibi-Radar Chibi-Gear", 25, 0x83, Progression, Grant),
    item("Ticket Stub", 26, 0x66, Progression, Grant),
    item("Foyer Waterfall Frog Ring", 27, 0x00, Progression, Grant),
    item("Basement Frog Ring", 28, 0x00, Progression, Grant),
    item("Backyard Frog Ring", 29, 0x00, Progression, Grant),
    item("Jenny's Room Frog Ring", 30, 0x00, Progression, Grant),
    item("Living Room Frog Ring (Behind Window)", 31, 0x00, Useful, Grant),
    item("Living Room Frog Ring (Corkboard)", 32, 0x00, Useful, Grant),
    item("Living Room Frog Ring (Shelf)", 33, 0x00, Useful, Grant),
    item("Kitchen Frog Ring (Table)", 34, 0x00, Useful, Grant),
    item("Sink Drain Frog Ring", 35, 0x00, Useful, Grant),
    item("Green Brick", 36, 0x78, Useful, Grant),
    item("White Brick", 37, 0x77, Useful, Grant),
    item("Yellow Brick", 38, 0x79, Useful, Grant),
    item("Purple Brick", 39, 0x7a, Useful, Grant),
    item("Bandage", 40, 0x67, Useful, Grant),
    item("Dog Tags", 41, 0x65, Useful, Grant),
    item("Hot Rod", 42, 0x7b, Useful, Grant),
    item("Gunpower", 43, 0x62, Useful, Grant),
    item("Free Rangers Photo", 44, 0x7a, Useful, Grant),
    item("Passed-out Frog", 45, 0x7f, Useful, Grant),
    item("Yellow Crayon", 46, 0x97, Useful, Grant),
    item("Snorkel", 47, 0x63, Useful, Grant),
    item("junk_item", 48, 0x12, Useful, Scrap(10)),
    item("Coin C 1", 49, 0x6b, Filler, Currency(10)),
    item("Coin C 2", 50, 0x6b, Filler, Currency(10)),
    item("Coin C 3", 51, 0x6b, Filler, Currency(10)),
    item("Coin C 4", 52, 0x6b, Filler, Currency(10)),
    item("Coin C 5", 53, 0x6b, Filler, Currency(10)),
    item("Coin C 6", 54, 0x6b, Filler, Currency(10)),
    item("Coin C 7", 55, 0x6b, Filler, Currency(10)),
    item("Coin C 8", 56, 0x6b, Filler, Currency(10)),
    item("Coin C 9", 57, 0x6b, Filler, Currency(10)),
    item("Coin C 10", 58, 0x6b, Filler, Currency(10)),
    item("Coin C 11", 59, 0x6b, Filler, Currency(10)),
    item("Coin C 12", 60, 0x6b, Filler, Currency(10)),
    item("Coin C 13", 61, 0x6b, Filler, Currency(10)),
    item("Coin C 14", 62, 0x6b, Filler, Currency(10)),
    item("Coin C 15", 63, 0x6b, Filler, Currency(10)),
    item("Coin C 16", 64, 0x6b, Filler, Currency(10)),
    item("Coin C 17", 65, 0x6b, Filler, Currency(10)),
    item("Coin C 18", 66, 0x6b, Filler, Currency(10)),
    item("Coin C 19", 67, 0x6b, Filler, Currency(10)),
    item("Coin C 20", 68, 0x6b, Filler, Currency(10)),
    item("Coin C 21", 69, 0x6b, Filler, Currency(10)),
    item("Coin C 22", 70, 0x6b, Filler, Currency(10)),
    item("Coin C 23", 71, 0x6b, Filler, Currency(10)),
    item("Coin C 24", 72, 0x6b, Filler, Currency(10)),
    item("Coin C 25", 73, 0x6b, Filler, Currency(10)),
    item("Coin C 26", 74, 0x6b, Filler, Currency(10)),
    item("Coin C 27", 75, 0x6b, Filler, Currency(10)),
    item("Coin C 28", 76, 0x6b, Filler, Currency(10)),
    item("Coin C 29", 77, 0x6b, Filler, Currency(10)),
    item("Coin C 30", 78, 0x6b, Filler, Currency(10)),
    item("Coin S 1", 79, 0x6b, Filler, Currency(50)),
    item("Coin S 2", 80, 0x6b, Filler, Currency(50)),
    item("Coin S 3", 81, 0x6b, Filler, Currency(50)),
    item("Coin S 4", 82, 0x6b, Filler, Currency(50)),
    item("Coin S 5", 83, 0x6b, Filler, Currency(50)),
    item("Coin S 6", 84, 0x6b, Filler, Currency(50)),
    item("Coin S 7", 85, 0x6b, Filler, Currency(50)),
    item("Coin G 1", 86, 0x6b, Filler, Currency(100)),
    item("Coin G 2", 87, 0x6b, Filler, Currency(100)),
    item("Coin G 3", 88, 0x6b, Filler, Currency(100)),
    item("Coin G 4", 89, 0x6b, Filler, Currency(100)),
    item("Junk A 1", 90, 0x12, Filler, Scrap(10)),
    item("Junk A 2", 91, 0x12, Filler, Scrap(10)),
    item("Junk A 3", 92, 0x12, Filler, Scrap(10)),
    item("Junk A 4", 93, 0x6b, Filler, Scrap(10)),
    item("Junk A 5", 94, 0x12, Filler, Scrap(10)),
    item("Junk A 6", 95, 0x12, Filler, Scrap(10)),
    item("Junk A 7", 96, 0x12, Filler, Scrap(10)),
    item("Junk A 8", 97, 0x12, Filler, Scrap(10)),
    item("Junk A 9", 98, 0x12, Filler, Scrap(10)),
    item("Junk A 10", 99, 0x12, Filler, Scrap(10)),
    item("Junk A 11", 100, 0x12, Filler, Scrap(10)),
    item("Junk A 12", 101, 0x12, Filler, Scrap(10)),
    item("Junk A 13", 102, 0x12, Filler, Scrap(10)),
    item("Junk A 14", 103, 0x12, Filler, Scrap(10)),
    item("Junk A 15", 104, 0x12, Filler, Scrap(10)),
    item("Junk A 16", 105, 0x12, Filler, Scrap(10)),
    item("Junk A 17", 106, 0x12, Filler, Scrap(10)),
    item("Junk B 1", 107, 0x12, Filler, Scrap(50)),
    item("Junk B 2", 108, 0x12, Filler, Scrap(50)),
    item("Junk B 3", 109, 0x12, Filler, Scrap(50)),
    item("Junk B 4", 110, 0x12, Filler, Scrap(50)),
    item("Junk B 5", 111, 0x12, Filler, Scrap(50)),
    item("Junk B 6", 112, 0x12, Filler, Scrap(50)),
    item("Junk B 7", 113, 0x12, Filler, Scrap(50)),
    item("Junk B 8", 114, 0x12, Filler, Scrap(50)),
    item("Junk B 9", 115, 0x12, Filler, Scrap(50)),
    item("Junk B 10", 116, 0x12, Filler, Scrap(50)),
    item("Junk B 11", 117, 0x12, Filler, Scrap(50)),
    item("Junk B 12", 118, 0x12, Filler, Scrap(50)),
    item("Junk B 13", 119, 0x12, Filler, Scrap(50)),
    item("Junk B 14", 120, 0x12, Filler, Scrap(50)),
    item("Junk B 15", 121, 0x12, Filler, Scrap(50)),
    item("Junk B 16", 122, 0x12, Filler, Scrap(50)),
    item("Junk B 17", 123, 0x12, Filler, Scrap(50)),
    item("Junk C 1", 124, 0x12, Filler, Scrap(100)),
    item("Junk C 2", 125, 0x12, Filler, Scrap(100)),
    item("Junk C 3", 126, 0x12, Filler, Scrap(100)),
    item("Junk C 4", 127, 0x12, Filler, Scrap(100)),
    item("Junk C 5", 128, 0x12, Filler, Scrap(100)),
    item("Junk C 6", 129, 0x12, Filler, Scrap(100)),
    item("Junk C 7", 130, 0x12, Filler, Scrap(100)),
    item("Junk C 8", 131, 0x12, Filler, Scrap(100)),
    item("Junk C 9", 132, 0x12, Filler, Scrap(100)),
    item("Junk C 10", 133, 0x12, Filler, Scrap(100)),
    item("Junk C 11", 134, 0x12, Filler, Scrap(100)),
    item("Junk C 12", 135, 0x12, Filler, Scrap(100)),
    item("Junk C 13", 136, 0x12, Filler, Scrap(100)),
    item("Junk C 14", 137, 0x12, Filler, Scrap(100)),
    item("Junk C 15", 138, 0x12, Filler, Scrap(100)),
    item("Junk C 16", 139, 0x12, Filler, Scrap(100)),
    item("Junk C 17", 140, 0x12, Filler, Scrap(100)),
    item("Wastepaper 1", 141, 0x12, Filler, Grant),
    item("Wastepaper 2", 142, 0x12, Filler, Grant),
    item("Wastepaper 3", 143, 0x12, Filler, Grant),
    item("Wastepaper 4", 144, 0x12, Filler, Grant),
    item("Wastepaper 5", 145, 0x12, Filler, Grant),
    item("Wastepaper 6", 146, 0x12, Filler, Grant),
    item("Wastepaper 7", 147, 0x12, Filler, Grant),
    item("Wastepaper 8", 148, 0x12, Filler, Grant),
    item("Wastepaper 9", 149, 0x12, Filler, Grant),
    item("Wastepaper 10", 150, 0x12, Filler, Grant),
    item("Wastepaper 11", 151, 0x12, Filler, Grant),
    item("Wastepaper 12", 152, 0x12, Filler, Grant),
    item("Wastepaper 13", 153, 0x12, Filler, Grant),
    item("Wastepaper 14", 154, 0x12, Filler, Grant),
    item("Wastepaper 15", 155, 0x12, Filler, Grant),
    item("Wastepaper 16", 156, 0x12, Filler, Grant),
    item("Wastepaper 17", 157, 0x12, Filler, Grant),
    item("Wastepaper 18", 158, 0x12, Filler, Grant),
    item("Wastepaper 19", 159, 0x12, Filler, Grant),
    item("Wastepaper 20", 160, 0x12, Filler, Grant),
    item("Wastepaper 21", 161, 0x12, Filler, Grant),
    item("Wastepaper 22", 162, 0x12, Filler, Grant),
    item("Candy Wrapper 1", 163, 0x88, Filler, Grant),
    item("Candy Wrapper 2", 164, 0x88, Filler, Grant),
    item("Candy Wrapper 3", 165, 0x88, Filler, Grant),
    item("Candy Wrapper 4", 166, 0x88, Filler, Grant),
    item("Candy Wrapper 5", 167, 0x88, Filler, Grant),
    item("Candy Wrapper 6", 168, 0x88, Filler, Grant),
    item("Candy Wrapper 7", 169, 0x88, Filler, Grant),
    item("Candy Wrapper 8", 170, 0x88, Filler, Grant),
    item("Candy Wrapper 9", 171, 0x88, Filler, Grant),
    item("Candy Wrapper 10", 172, 0x88, Filler, Grant),
    item("Candy Wrapper 11", 173, 0x88, Filler, Grant),
    item("Candy Wrapper 12", 174, 0x88, Filler, Grant),
    item("Candy Wrapper 13", 175, 0x88, Filler, Grant),
    item("Candy Wrapper 14", 176, 0x88, Filler, Grant),
    item("Candy Wrapper 15", 177, 0x88, Filler, Grant),
    item("Candy Wrapper 16", 178, 0x88, Filler, Grant),
    item("Candy Wrapper 17", 179, 0x88, Filler, Grant),
    item("Candy Wrapper 18", 180, 0x88, Filler, Grant),
    item("Candy Wrapper 19", 181, 0x88, Filler, Grant),
    item("Candy Wrapper 20", 182, 0x88, Filler, Grant),
    item("Candy Wrapper 21", 183, 0x88, Filler, Grant),
    item("Candy Wrapper 22", 184, 0x88, Filler, Grant),
    item("Candy Bag 1", 185, 0x89, Filler, Grant),
    item("Candy Bag 2", 186, 0x89, Filler, Grant),
    item("Candy Bag 3", 187, 0x89, Filler, Grant),
    item("Candy Bag 4", 188, 0x89, Filler, Grant),
    item("Candy Bag 5", 189, 0x89, Filler, Grant),
    item("Cookie Box 1", 190, 0x8a, Filler, Grant),
    item("Cookie Box 2", 191, 0x8a, Filler, Grant),
    item("Cookie Box 3", 192, 0x8a, Filler, Grant),
    item("Cookie Box 4", 193, 0x8a, Filler, Grant),
    item("Cookie Box 5", 194, 0x8a, Filler, Grant),
    item("Cookie Box 6", 195, 0x8a, Filler, Grant),
    item("Cookie Box 7", 196, 0x8a, Filler, Grant),
    item("Empty Can 1", 197, 0x6b, Filler, Grant),
    item("Empty Can 2", 198, 0x6b, Filler, Grant),
    item("Empty Can 3", 199, 0x6b, Filler, Grant),
    item("Coin G 6", 211, 0x6b, Filler, Currency(100)),
    item("Coin G 7", 212, 0x6b, Filler, Currency(100)),
    item("Coin G 8", 213, 0x6b, Filler, Currency(100)),
    item("Coin G 9", 214, 0x6b, Filler, Currency(100)),
    item("Coin G 10", 215, 0x6b, Filler, Currency(100)),
    item("Coin G 11", 216, 0x6b, Filler, Currency(100)),
    item("Coin G 12", 217, 0x6b, Filler, Currency(100)),
    item("Coin G 13", 218, 0x6b, Filler, Currency(100)),
    item("Coin G 14", 219, 0x6b, Filler, Currency(100)),
    item("Coin G 15", 220, 0x6b, Filler, Currency(100)),
    item("Coin G 16", 221, 0x6b, Filler, Currency(100)),
    item("Coin G 17", 222, 0x6b, Filler, Currency(100)),
    item("Coin G 18", 223, 0x6b, Filler, Currency(100)),
    item("Coin G 19", 224, 0x6b, Filler, Currency(100)),
    item("Coin G 20", 225, 0x6b, Filler, Currency(100)),
    item("Coin G 21", 226, 0x6b, Filler, Currency(100)),
    item("Coin G 22", 227, 0x6b, Filler, Currency(100)),
    item("Coin G 23", 228, 0x6b, Filler, Currency(100)),
    item("Coin G 24", 229, 0x6b, Filler, Currency(100)),
    item("Coin G 25", 230, 0x6b, Filler, Currency(100)),
    item("Coin G 26", 231, 0x6b, Filler, Currency(100)),
    item("Coin G 27", 232, 0x6b, Filler, Currency(100)),
    item("Blue Brick", 233, 0x7a, Useful, Grant),
    item("Space Scrambler", 234, 0x6b, Useful, Grant),
    item("Coin G 28", 235, 0x6b, Filler, Currency(100)),
    item("Coin G 29", 236, 0x6b, Filler, Currency(100)),
    item("Coin G 30", 237, 0x6b, Filler, Currency(100)),
    item("Coin G 31", 238, 0x6b, Filler, Currency(100)),
    item("Coin G 32", 239, 0x6b, Filler, Currency(100)),
    item("Coin G 33", 240, 0x6b, Filler, Currency(100)),
    item("Coin G 34", 241, 0x6b, Filler, Currency(100)),
    item("Coin G 35", 242, 0x6b, Filler, Currency(100)),
    item("Coin G 36", 243, 0x6b, Filler, Currency(100)),
    item("Coin G 37", 244, 0x6b, Filler, Currency(100)),
    item("Coin G 38", 245, 0x6b, Filler, Currency(100)),
];

static BY_NAME: LazyLock<HashMap<&'static str, &'static ItemData>> =
    LazyLock::new(|| ITEMS.iter().map(|i| (i.name, i)).collect());

static BY_REMOTE_ID: LazyLock<HashMap<i64, &'static ItemData>> =
    LazyLock::new(|| ITEMS.iter().map(|i| (i.remote_id(), i)).collect());

pub fn by_name(name: &str) -> Option<&'static ItemData> {
    BY_NAME.get(name).copied()
}

pub fn by_remote_id(id: i64) -> Option<&'static ItemData> {
    BY_REMOTE_ID.get(&id).copied()
}

pub fn name_of(id: i64) -> Option<&'static str> {
    by_remote_id(id).map(|i| i.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_and_names_are_unique() {
        let codes: HashSet<_> = ITEMS.iter().map(|i| i.code).collect();
        let names: HashSet<_> = ITEMS.iter().map(|i| i.name).collect();
        assert_eq!(codes.len(), ITEMS.len());
        assert_eq!(names.len(), ITEMS.len());
    }

    #[test]
    fn test_lookups() {
        let toothbrush = by_name("Toothbrush Chibi-Gear").unwrap();
        assert_eq!(toothbrush.remote_id(), 2_322_432);
        assert_eq!(toothbrush.game_id, 0x10);
        assert_eq!(name_of(2_322_432 + 233), Some("Blue Brick"));
        assert!(by_remote_id(ITEM_ID_BASE - 1).is_none());
    }

    #[test]
    fn test_categories() {
        assert_eq!(by_name("Coin C 1").unwrap().category, Currency(10));
        assert_eq!(by_name("Coin S 7").unwrap().category, Currency(50));
        assert_eq!(by_name("Coin G 38").unwrap().category, Currency(100));
        assert_eq!(by_name("junk_item").unwrap().category, Scrap(10));
        assert_eq!(by_name("Junk B 3").unwrap().category, Scrap(50));
        assert_eq!(by_name("Junk C 17").unwrap().category, Scrap(100));
        assert_eq!(by_name("Wastepaper 1").unwrap().category, Grant);
        assert_eq!(by_name("Giga-Battery").unwrap().classification, Progression);
    }
}
