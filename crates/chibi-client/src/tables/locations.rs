//! Location catalog.
//!
//! Each area keeps a 128-bit completion bitfield in game memory. A
//! location's `bit` is its position within its own area's bitfield,
//! counted from the least significant bit in catalog order.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Offset added to a location code to form its session id.
pub const LOCATION_ID_BASE: i64 = 2_326_528;

/// Name of the goal location. It has no code and no bit.
///
/// Completion is approximated by entering [`GOAL_AREA`], the boss room. The
/// real completion condition is holding the Chibi-Blaster and beating the
/// boss, but no boss-defeat flag is known in game memory, so a player who
/// enters the room and then loses still reports the goal.
pub const GOAL_LOCATION: &str = "Mother Spider's Room - Defeat Mother Spider";

/// Stage code of Mother Spider's room.
pub const GOAL_AREA: u32 = 0x16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationData {
    pub name: &'static str,
    /// `None` for the goal location
    pub code: Option<u32>,
    pub region: &'static str,
    /// Stage code the location is checked in
    pub area: u32,
    /// Bit in the area bitfield, `None` for the goal location
    pub bit: Option<u8>,
}

impl LocationData {
    /// Session id of this location.
    pub const fn remote_id(&self) -> Option<i64> {
        match self.code {
            Some(code) => Some(LOCATION_ID_BASE + code as i64),
            None => None,
        }
    }

    pub const fn is_goal(&self) -> bool {
        self.bit.is_none()
    }

    /// Whether this location is marked complete in `bitfield`.
    pub fn is_set(&self, bitfield: u128) -> bool {
        self.bit.is_some_and(|bit| bitfield & (1u128 << bit) != 0)
    }
}

const fn location(name: &'static str, code: u32, region: &'static str, area: u32, bit: u8) -> LocationData {
    LocationData {
        name,
        code: Some(code),
        region,
        area,
        bit: Some(bit),
    }
}

/// Every location, in code order, followed by the goal.
pub static LOCATIONS: &[LocationData] = &[
    location("Living Room - Frog Ring (Behind Window)", 0, "Living Room", 0x07, 0),
    location("Living Room - Frog Ring (Corkboard)", 1, "Living Room", 0x07, 1),
    location("Living Room - Frog Ring (Shelf)", 2, "Living Room", 0x07, 2),
    location("Living Room - Table 10M Coin", 3, "Living Room", 0x07, 3),
    location("Living Room - Under Bookshelf 10M Coin", 4, "Living Room", 0x07, 4),
    location("Living Room - Under TV 10M Coin", 5, "Living Room", 0x07, 5),
    location("Living Room - Bookshelf 10M Coin A", 6, "Living Room", 0x07, 6),
    location("Living Room - Bookshelf 10M Coin B", 7, "Living Room", 0x07, 7),
    location("Living Room - Armchair 10M Coin", 8, "Living Room", 0x07, 8),
    location("Living Room - Under Couch 10M Coin", 9, "Living Room", 0x07, 9),
    location("Living Room - Couch Backseat 10M Coin A", 10, "Living Room", 0x07, 10),
    location("Living Room - Couch Backseat 10M Coin B", 11, "Living Room", 0x07, 11),
    location("Living Room - Couch Backseat 10M Coin C", 12, "Living Room", 0x07, 12),
    location("Living Room - Cupholder 50M Coin", 13, "Living Room", 0x07, 13),
    location("Living Room - Plant Shelf 50M A", 14, "Living Room", 0x07, 14),
    location("Living Room - Plant Shelf 50M B", 15, "Living Room", 0x07, 15),
    location("Living Room - Plant Leaf 50M Coin", 16, "Living Room", 0x07, 16),
    location("Living Room - Wastepaper by Trashbin B", 17, "Living Room", 0x07, 17),
    location("Living Room - Candy Wrapper above Trashbin A", 18, "Living Room", 0x07, 18),
    location("Living Room - Wastepaper by Trashbin A", 19, "Living Room", 0x07, 19),
    location("Living Room - Cupholder Wastepaper", 20, "Living Room", 0x07, 20),
    location("Living Room - Cookie Crumbs under Table", 21, "Living Room", 0x07, 21),
    location("Living Room - Cookie Crumbs by Record Player", 22, "Living Room", 0x07, 22),
    location("Living Room - Toothbrush", 23, "Living Room", 0x07, 23),
    location("Living Room - Armchair Happy Block", 24, "Living Room", 0x07, 24),
    location("Living Room - Bookshelf Happy Block (Lower)", 25, "Living Room", 0x07, 25),
    location("Living Room - Top of Record Player Shelving Happy Block", 26, "Living Room", 0x07, 26),
    location("Living Room - Bookshelf Happy Block (Upper)", 27, "Living Room", 0x07, 27),
    location("Living Room - Plant Shelf Happy Block (Lower)", 28, "Living Room", 0x07, 28),
    location("Living Room - Grandfather Clock Shelving Happy Block", 29, "Living Room", 0x07, 29),
    location("Living Room - Happy Block above Chibi House", 30, "Living Room", 0x07, 30),
    location("Living Room - Plant Shelf Happy Block (Upper)", 31, "Living Room", 0x07, 31),
    location("Living Room - Happy Block above Fireplace", 32, "Living Room", 0x07, 32),
    location("Living Room - Happy Block by Record Player", 33, "Living Room", 0x07, 33),
    location("Living Room - Wastepaper by Door to Kitchen", 34, "Living Room", 0x07, 34),
    location("Living Room - Fireplace Wastepaper A", 35, "Living Room", 0x07, 35),
    location("Living Room - Fireplace Wastepaper B", 36, "Living Room", 0x07, 36),
    location("Living Room - Wastepaper on Stack of Books", 37, "Living Room", 0x07, 37),
    location("Living Room - Couch Wastepaper B", 38, "Living Room", 0x07, 38),
    location("Living Room - Armchair 50M Coin", 39, "Living Room", 0x07, 39),
    location("Living Room - Lamp 50M Coin", 40, "Living Room", 0x07, 40),
    location("Living Room - Wastepaper by Toothbrush Spawn", 41, "Living Room", 0x07, 41),
    location("Living Room - Wastepaper below Cupholder", 42, "Living Room", 0x07, 42),
    location("Living Room - Couch Wastepaper A", 43, "Living Room", 0x07, 43),
    location("Living Room - Cookie Crumbs under Couch", 44, "Living Room", 0x07, 44),
    location("Living Room - Cookie Crumbs on Couch", 45, "Living Room", 0x07, 45),
    location("Living Room - Twig A", 46, "Living Room", 0x07, 46),
    location("Living Room - Twig B", 47, "Living Room", 0x07, 47),
    location("Living Room - Twig C", 48, "Living Room", 0x07, 48),
    location("Living Room - 50M Coin on top of Chibi House", 49, "Living Room", 0x07, 49),
    location("Living Room - Couch 10M Coin (Below Left Armrest)", 50, "Living Room", 0x07, 50),
    location("Living Room - 10M Coin behind Grandfather Clock Shelving A", 51, "Living Room", 0x07, 51),
    location("Living Room - 10M Coin behind Grandfather Clock Shelving B", 52, "Living Room", 0x07, 52),
    location("Living Room - 10M Coin behind Grandfather Clock Shelving C", 53, "Living Room", 0x07, 53),
    location("Living Room - Wastepaper above Trashbin A", 54, "Living Room", 0x07, 54),
    location("Living Room - Wastepaper above Trashbin B", 55, "Living Room", 0x07, 55),
    location("Living Room - Candy Wrapper above Trashbin B", 56, "Living Room", 0x07, 56),
    location("Living Room - Candy Wrapper by Jenny A", 57, "Living Room", 0x07, 57),
    location("Living Room - Couch Candy Wrapper", 58, "Living Room", 0x07, 58),
    location("Living Room - Candy Wrapper by Jenny B", 59, "Living Room", 0x07, 59),
    location("Living Room - Candy Wrapper on Book Stack", 60, "Living Room", 0x07, 60),
    location("Living Room - Armchair Candy Wrapper B", 61, "Living Room", 0x07, 61),
    location("Living Room - Armchair Candy Wrapper A", 62, "Living Room", 0x07, 62),
    location("Living Room - Cupholder Candy Wrapper", 63, "Living Room", 0x07, 63),
    location("Living Room - Couch Candy Bag", 64, "Living Room", 0x07, 64),
    location("Living Room - Table Cookie Box A", 65, "Living Room", 0x07, 65),
    location("Living Room - Table Cookie Box B", 66, "Living Room", 0x07, 66),
    location("Kitchen - Mug Location", 67, "Kitchen", 0x01, 0),
    location("Kitchen - Spoon Location", 68, "Kitchen", 0x01, 1),
    location("Kitchen - Wastepaper by Foyer Door", 69, "Kitchen", 0x01, 2),
    location("Kitchen - Wastepaper under Counter", 70, "Kitchen", 0x01, 3),
    location("Kitchen - Cookie Crumbs by Tao's Bowl", 71, "Kitchen", 0x01, 4),
    location("Kitchen - Cookie Crumbs by Spoon", 72, "Kitchen", 0x01, 5),
    location("Kitchen - Cookie Crumbs on Kitchen Table", 73, "Kitchen", 0x01, 6),
    location("Kitchen - Cookie Crumbs next to Fridge on Counter", 74, "Kitchen", 0x01, 7),
    location("Kitchen - Table Happy Block", 75, "Kitchen", 0x01, 8),
    location("Kitchen - Cabinet Happy Block", 76, "Kitchen", 0x01, 9),
    location("Kitchen - Happy Block above Bandage", 77, "Kitchen", 0x01, 10),
    location("Kitchen - Happy Block by Bridge Only Chibi Door", 78, "Kitchen", 0x01, 11),
    location("Kitchen - Twig A", 79, "Kitchen", 0x01, 12),
    location("Kitchen - Twig B", 80, "Kitchen", 0x01, 13),
    location("Kitchen - Twig C", 81, "Kitchen", 0x01, 14),
    location("Kitchen - Dog Tags Location", 82, "Kitchen", 0x01, 15),
    location("Kitchen - Bandage Location", 83, "Kitchen", 0x01, 16),
    location("Kitchen - Frog Ring (Table)", 84, "Kitchen", 0x01, 17),
    location("Kitchen - Pink Soda Can", 85, "Kitchen", 0x01, 18),
    location("Kitchen - Purple Soda Can", 86, "Kitchen", 0x01, 19),
    location("Kitchen - Table Candy Wrapper A", 87, "Kitchen", 0x01, 20),
    location("Kitchen - Table Candy Wrapper B", 88, "Kitchen", 0x01, 21),
    location("Kitchen - Table Candy Bag", 89, "Kitchen", 0x01, 22),
    location("Kitchen - Cookie Box by Spoon A", 90, "Kitchen", 0x01, 23),
    location("Kitchen - Cookie Box by Spoon B", 91, "Kitchen", 0x01, 24),
    location("Kitchen - High Cupboard 10M Coin", 92, "Kitchen", 0x01, 25),
    location("Kitchen - 10M Coin by Stove", 93, "Kitchen", 0x01, 26),
    location("Kitchen - 10M Coin by Sink", 94, "Kitchen", 0x01, 27),
    location("Kitchen - 10M behind Bottles", 95, "Kitchen", 0x01, 28),
    location("Sink Drain - Middle Row 100M Coin C", 96, "Sink Drain", 0x0b, 0),
    location("Sink Drain - Middle Row 100M Coin B", 97, "Sink Drain", 0x0b, 1),
    location("Sink Drain - Middle Row 100M Coin A", 98, "Sink Drain", 0x0b, 2),
    location("Sink Drain - Middle Row 10M Coin C", 99, "Sink Drain", 0x0b, 3),
    location("Sink Drain - Middle Row 10M Coin B", 100, "Sink Drain", 0x0b, 4),
    location("Sink Drain - Middle Row 10M Coin A", 101, "Sink Drain", 0x0b, 5),
    location("Sink Drain - Top Row 100M Coin", 102, "Sink Drain", 0x0b, 6),
    location("Sink Drain - Top Row 10M Coin B", 103, "Sink Drain", 0x0b, 7),
    location("Sink Drain - Top Row 10M Coin A", 104, "Sink Drain", 0x0b, 8),
    location("Sink Drain - Frog Ring", 105, "Sink Drain", 0x0b, 9),
    location("Foyer - Top of Stairs 10M Coin", 106, "Foyer", 0x02, 0),
    location("Foyer - Free Rangers Photo", 107, "Foyer", 0x02, 1),
    location("Foyer - Waterfall Frog Ring", 108, "Foyer", 0x02, 2),
    location("Foyer - Red Block", 109, "Foyer", 0x02, 3),
    location("Basement - Giga Battery", 110, "Basement", 0x03, 0),
    location("Basement - Giga Charger", 111, "Basement", 0x03, 1),
    location("Basement - Wine Bottle A", 112, "Basement", 0x03, 2),
    location("Basement - Wine Bottle B", 113, "Basement", 0x03, 3),
    location("Basement - Wastepaper below Dresser", 114, "Basement", 0x03, 4),
    location("Basement - Wastepaper below Stairs", 115, "Basement", 0x03, 5),
    location("Basement - Wastepaper on Stairs", 116, "Basement", 0x03, 6),
    location("Basement - Wastepaper on Shelf", 117, "Basement", 0x03, 7),
    location("Basement - Broken Bottle Bottom", 118, "Basement", 0x03, 8),
    location("Basement - Broken Bottle Top", 119, "Basement", 0x03, 9),
    location("Basement - Gunpowder", 120, "Basement", 0x03, 10),
    location("Basement - Frog Ring", 121, "Basement", 0x03, 11),
    location("Basement - Purple Can", 122, "Basement", 0x03, 12),
    location("Basement - Cabinet Trash A", 123, "Basement", 0x03, 13),
    location("Basement - Cabinet Trash B", 124, "Basement", 0x03, 14),
    location("Basement - Shelf Happy Block B", 125, "Basement", 0x03, 15),
    location("Basement - Shelf Happy Block A", 126, "Basement", 0x03, 16),
    location("Basement - Rafters Happy Block B", 127, "Basement", 0x03, 17),
    location("Basement - Rafters Happy Block A", 128, "Basement", 0x03, 18),
    location("Basement - Stairs Happy Block", 129, "Basement", 0x03, 19),
    location("Basement - Swing 10M Coin", 130, "Basement", 0x03, 20),
    location("Backyard - Twig by Glass Door", 131, "Backyard", 0x09, 0),
    location("Backyard - Twig by Fence", 132, "Backyard", 0x09, 1),
    location("Backyard - Twig under Tree", 133, "Backyard", 0x09, 2),
    location("Backyard - Twig under Awning", 134, "Backyard", 0x09, 3),
    location("Backyard - Scurvy Splinter", 135, "Backyard", 0x09, 4),
    location("Backyard - Weeds A", 136, "Backyard", 0x09, 5),
    location("Backyard - Weeds B", 137, "Backyard", 0x09, 6),
    location("Backyard - Weeds C", 138, "Backyard", 0x09, 7),
    location("Backyard - Frog Ring", 139, "Backyard", 0x09, 8),
    location("Backyard - Right Awning Happy Block C", 140, "Backyard", 0x09, 9),
    location("Backyard - Right Awning Happy Block B", 141, "Backyard", 0x09, 10),
    location("Backyard - Left Awning Happy Block", 142, "Backyard", 0x09, 11),
    location("Backyard - Tree Happy Block", 143, "Backyard", 0x09, 12),
    location("Backyard - Right Awning Happy Block A", 144, "Backyard", 0x09, 13),
    location("Backyard - White Block", 145, "Backyard", 0x09, 14),
    location("Jenny's Room - AA Battery", 146, "Jenny's Room", 0x04, 0),
    location("Jenny's Room - Happy Block by TV", 147, "Jenny's Room", 0x04, 1),
    location("Jenny's Room - Happy Block on Train Shelf B", 148, "Jenny's Room", 0x04, 2),
    location("Jenny's Room - Happy Block on Chair", 149, "Jenny's Room", 0x04, 3),
    location("Jenny's Room - Happy Block on Bookshelf", 150, "Jenny's Room", 0x04, 4),
    location("Jenny's Room - Happy Block on Train Shelf A", 151, "Jenny's Room", 0x04, 5),
    location("Jenny's Room - D Battery", 152, "Jenny's Room", 0x04, 6),
    location("Jenny's Room - C Battery", 153, "Jenny's Room", 0x04, 7),
    location("Jenny's Room - Wastepaper by Trashcan", 154, "Jenny's Room", 0x04, 8),
    location("Jenny's Room - Wastepaper by Piano", 155, "Jenny's Room", 0x04, 9),
    location("Jenny's Room - Wastepaper under Dresser", 156, "Jenny's Room", 0x04, 10),
    location("Jenny's Room - Wastepaper under Bed A", 157, "Jenny's Room", 0x04, 11),
    location("Jenny's Room - Wastepaper under Bed B", 158, "Jenny's Room", 0x04, 12),
    location("Jenny's Room - Wastepaper under Bed C", 159, "Jenny's Room", 0x04, 13),
    location("Jenny's Room - Wastepaper under Bed D", 160, "Jenny's Room", 0x04, 14),
    location("Jenny's Room - Wastepaper by Crayon Box", 161, "Jenny's Room", 0x04, 15),
    location("Jenny's Room - Red Shoe", 162, "Jenny's Room", 0x04, 16),
    location("Jenny's Room - Frog Ring", 163, "Jenny's Room", 0x04, 17),
    location("Jenny's Room - Squirter", 164, "Jenny's Room", 0x04, 18),
    location("Jenny's Room - Snorkel", 165, "Jenny's Room", 0x04, 19),
    location("Jenny's Room - Cookie Crumbs under Bed A", 166, "Jenny's Room", 0x04, 20),
    location("Jenny's Room - Cookie Crumbs under Bed B", 167, "Jenny's Room", 0x04, 21),
    location("Jenny's Room - Cookie Crumbs under Bed C", 168, "Jenny's Room", 0x04, 22),
    location("Jenny's Room - Cookie Crumbs under Bed D", 169, "Jenny's Room", 0x04, 23),
    location("Jenny's Room - Cookie Crumbs by Chair", 170, "Jenny's Room", 0x04, 24),
    location("Jenny's Room - Cookie Crumbs on Desk A", 171, "Jenny's Room", 0x04, 25),
    location("Jenny's Room - Cookie Crumbs B", 172, "Jenny's Room", 0x04, 26),
    location("Jenny's Room - Candy Wrapper below Bed A", 173, "Jenny's Room", 0x04, 27),
    location("Jenny's Room - Candy Wrapper below Bed B", 174, "Jenny's Room", 0x04, 28),
    location("Jenny's Room - Candy Wrapper below Bed C", 175, "Jenny's Room", 0x04, 29),
    location("Jenny's Room - Candy Wrapper on Bed A", 176, "Jenny's Room", 0x04, 30),
    location("Jenny's Room - Candy Wrapper on Bed B", 177, "Jenny's Room", 0x04, 31),
    location("Jenny's Room - Candy Wrapper by TV", 178, "Jenny's Room", 0x04, 32),
    location("Jenny's Room - Candy Wrapper by Crayon Box A", 179, "Jenny's Room", 0x04, 33),
    location("Jenny's Room - Candy Wrapper by Crayon Box B", 180, "Jenny's Room", 0x04, 34),
    location("Jenny's Room - Candy Bag under Bed", 181, "Jenny's Room", 0x04, 35),
    location("Jenny's Room - Candy Bag on Bed", 182, "Jenny's Room", 0x04, 36),
    location("Jenny's Room - Cookie Box under Bed A", 183, "Jenny's Room", 0x04, 37),
    location("Jenny's Room - Cookie Box under Bed B", 184, "Jenny's Room", 0x04, 38),
    location("Jenny's Room - Cookie Box on Desk", 185, "Jenny's Room", 0x04, 39),
    location("Jenny's Room - Orange Can", 186, "Jenny's Room", 0x04, 40),
    location("Jenny's Room - Purple Can", 187, "Jenny's Room", 0x04, 41),
    location("Jenny's Room - Red Crayon", 188, "Jenny's Room", 0x04, 42),
    location("Jenny's Room - Yellow Crayon", 189, "Jenny's Room", 0x04, 43),
    location("Jenny's Room - Green Crayon", 190, "Jenny's Room", 0x04, 44),
    location("Jenny's Room - Purple Crayon", 191, "Jenny's Room", 0x04, 45),
    location("Jenny's Room - Green Block", 192, "Jenny's Room", 0x04, 46),
    location("Jenny's Room - Stool 10M Coin", 193, "Jenny's Room", 0x04, 47),
    location("Jenny's Room - Bed Railing 10M Coin B", 194, "Jenny's Room", 0x04, 48),
    location("Jenny's Room - Bed Railing 10M Coin A", 195, "Jenny's Room", 0x04, 49),
    location("Jenny's Room - Slide 10M Coin", 196, "Jenny's Room", 0x04, 50),
    location("Jenny's Room - 10M Coin under Castle", 197, "Jenny's Room", 0x04, 51),
    location("Bedroom - Dinahs Teeth", 198, "Bedroom", 0x06, 0),
    location("Bedroom - Left Leg in Suitcase", 199, "Bedroom", 0x06, 1),
    location("Bedroom - Ticket Stub", 200, "Bedroom", 0x06, 2),
    location("Bedroom - Passed Out Frog", 201, "Bedroom", 0x06, 3),
    location("Bedroom - Wastepaper by Bills B", 202, "Bedroom", 0x06, 4),
    location("Bedroom - Wastepaper by Bills A", 203, "Bedroom", 0x06, 5),
    location("Bedroom - Wastepaper under Bed", 204, "Bedroom", 0x06, 6),
    location("Bedroom - Wastepaper under Vanity", 205, "Bedroom", 0x06, 7),
    location("Bedroom - Wastepaper on Vanity", 206, "Bedroom", 0x06, 8),
    location("Bedroom - Wastepaper on Bed", 207, "Bedroom", 0x06, 9),
    location("Bedroom - Wastepaper by Dinahs Place A", 208, "Bedroom", 0x06, 10),
    location("Bedroom - Wastepaper by Dinahs Place B", 209, "Bedroom", 0x06, 11),
    location("Bedroom - Cookie Crumbs on Toybox", 210, "Bedroom", 0x06, 12),
    location("Bedroom - Vanity Candy Wrapper A", 211, "Bedroom", 0x06, 13),
    location("Bedroom - Vanity Candy Wrapper B", 212, "Bedroom", 0x06, 14),
    location("Bedroom - Shelf Candy Wrapper", 213, "Bedroom", 0x06, 15),
    location("Bedroom - Vanity Candy Bag", 214, "Bedroom", 0x06, 16),
    location("Bedroom - Happy Block by Ticket Stub (Lower Shelf)", 215, "Bedroom", 0x06, 17),
    location("Bedroom - Happy Block by Ticket Stub (Higher Shelf)", 216, "Bedroom", 0x06, 18),
    location("Bedroom - Vanity Stool 10M Coin", 217, "Bedroom", 0x06, 19),
    location("Bedroom - 10M Coin by Dinahs Place", 218, "Bedroom", 0x06, 20),
    location("Bedroom - 10M Coin under Bed", 219, "Bedroom", 0x06, 21),
    location("Bedroom - 10M Coin on Nightstand", 220, "Bedroom", 0x06, 22),
    location("Bedroom - 10M Coin on Shelf", 221, "Bedroom", 0x06, 23),
    location("Chibi House - Pink Flower Seed", 222, "Chibi House", 0x05, 0),
    location("Chibi House - Blue Flower Seed", 223, "Chibi House", 0x05, 1),
    location("Chibi House - White Flower Seed", 224, "Chibi House", 0x05, 2),
    location("Chibi House - Nectar Flower Seed", 225, "Chibi House", 0x05, 3),
    location("Chibi House - Charge Chip", 226, "Chibi House", 0x05, 4),
    location("Chibi House - Chibi Battery", 227, "Chibi House", 0x05, 5),
    location("Chibi House - Chibi Blaster", 228, "Chibi House", 0x05, 6),
    location("Chibi House - Range Chip", 229, "Chibi House", 0x05, 7),
    location("Chibi House - Chibi Radar", 230, "Chibi House", 0x05, 8),
    location("Chibi House - Alien Ear Chip", 231, "Chibi House", 0x05, 9),
    location("Chibi House - Hot Rod", 232, "Chibi House", 0x05, 10),
    location("Chibi House - Space Scrambler", 233, "Chibi House", 0x05, 11),
    LocationData {
        name: GOAL_LOCATION,
        code: None,
        region: "Mother Spider's Room",
        area: GOAL_AREA,
        bit: None,
    },
];

static BY_NAME: LazyLock<HashMap<&'static str, &'static LocationData>> =
    LazyLock::new(|| LOCATIONS.iter().map(|l| (l.name, l)).collect());

static BY_REMOTE_ID: LazyLock<HashMap<i64, &'static LocationData>> = LazyLock::new(|| {
    LOCATIONS
        .iter()
        .filter_map(|l| l.remote_id().map(|id| (id, l)))
        .collect()
});

static BY_AREA: LazyLock<HashMap<u32, Vec<&'static LocationData>>> = LazyLock::new(|| {
    let mut areas: HashMap<u32, Vec<&'static LocationData>> = HashMap::new();
    for location in LOCATIONS {
        areas.entry(location.area).or_default().push(location);
    }
    areas
});

pub fn by_name(name: &str) -> Option<&'static LocationData> {
    BY_NAME.get(name).copied()
}

pub fn by_remote_id(id: i64) -> Option<&'static LocationData> {
    BY_REMOTE_ID.get(&id).copied()
}

pub fn name_of(id: i64) -> Option<&'static str> {
    by_remote_id(id).map(|l| l.name)
}

/// Locations checked in the given stage, in catalog order.
pub fn in_area(area: u32) -> &'static [&'static LocationData] {
    BY_AREA.get(&area).map_or(&[][..], Vec::as_slice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_bits_are_unique_per_area_and_fit() {
        for (area, locations) in BY_AREA.iter() {
            let bits: HashSet<_> = locations.iter().filter_map(|l| l.bit).collect();
            let with_bits = locations.iter().filter(|l| l.bit.is_some()).count();
            assert_eq!(bits.len(), with_bits, "duplicate bit in area {area:#x}");
            assert!(bits.iter().all(|&b| b < 128));
        }
    }

    #[test]
    fn test_single_goal() {
        let goals: Vec<_> = LOCATIONS.iter().filter(|l| l.is_goal()).collect();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].name, GOAL_LOCATION);
        assert_eq!(goals[0].remote_id(), None);
        assert_eq!(in_area(GOAL_AREA).len(), 1);
    }

    #[test]
    fn test_lookups() {
        assert_eq!(LOCATIONS.len(), 235);
        assert_eq!(name_of(2_326_528), Some("Living Room - Frog Ring (Behind Window)"));
        assert_eq!(by_name("Chibi House - Space Scrambler").unwrap().code, Some(233));
        assert_eq!(in_area(0x07).len(), 67);
        assert_eq!(in_area(0x02).len(), 4);
        assert!(in_area(0x0E).is_empty());
    }

    #[test]
    fn test_is_set() {
        let location = in_area(0x07)[66];
        assert_eq!(location.bit, Some(66));
        assert!(location.is_set(1u128 << 66));
        assert!(!location.is_set(1u128 << 65));
    }
}
