//! Static game catalogs: items, locations and stages.

pub mod areas;
pub mod items;
pub mod locations;

/// Game name the session and the game-side client identify this world by.
pub const GAME_NAME: &str = "Chibi Robo";

pub use items::{ITEM_ID_BASE, ItemCategory, ItemData};
pub use locations::{GOAL_LOCATION, LOCATION_ID_BASE, LocationData};
