//! Output artifact produced at generation time.
//!
//! The artifact is the JSON file the generator writes for each player. The
//! client needs only the seed and slot name from it, but the whole record is
//! loaded and validated so a mismatched or truncated file is caught at
//! startup.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ArtifactError;

/// Artifact major version this client understands.
pub const SUPPORTED_MAJOR: u32 = 1;

/// Item placed at a location, as recorded by the generator.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PlacedItem {
    /// Slot of the player receiving the item (absent for empty locations)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<u32>,

    /// Item name
    pub name: String,

    /// Game the item belongs to
    pub game: String,

    /// "progression", "useful" or "filler"
    pub classification: String,
}

/// Per-world options written alongside the placements.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct GameOptions {
    /// Enable the in-game debug menu
    #[serde(default, deserialize_with = "toggle")]
    pub debug_menu: bool,

    /// Pajamas in the shop cost nothing
    #[serde(default, deserialize_with = "toggle")]
    pub free_pjs: bool,

    /// Giga-Battery starts charged
    #[serde(default, deserialize_with = "toggle")]
    pub charged_giga_battery: bool,

    /// Upstairs is open from the start
    #[serde(default, deserialize_with = "toggle")]
    pub open_upstairs: bool,

    /// Downstairs is open from the start
    #[serde(default, deserialize_with = "toggle")]
    pub open_downstairs: bool,

    /// Disable Chibi Vision
    #[serde(default, deserialize_with = "toggle")]
    pub chibi_vision_off: bool,
}

/// Options are written as 0/1 by the generator; accept booleans too.
fn toggle<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Toggle {
        Bool(bool),
        Int(u8),
    }

    match Toggle::deserialize(deserializer)? {
        Toggle::Bool(b) => Ok(b),
        Toggle::Int(0) => Ok(false),
        Toggle::Int(1) => Ok(true),
        Toggle::Int(n) => Err(serde::de::Error::custom(format!(
            "toggle must be 0 or 1, got {n}"
        ))),
    }
}

/// The generator's output for one player.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct OutputArtifact {
    /// Generator version triple
    pub version: [u32; 3],

    /// Seed identity of the multiworld
    pub seed: String,

    /// This player's slot number
    pub slot: u32,

    /// This player's slot name
    pub name: String,

    /// Location name to placed item
    #[serde(default)]
    pub locations: BTreeMap<String, PlacedItem>,

    /// World options, stored at the top level of the file
    #[serde(flatten)]
    pub options: GameOptions,
}

impl OutputArtifact {
    /// Load and validate an artifact file.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let file = File::open(path).map_err(|source| ArtifactError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact: Self = serde_json::from_reader(BufReader::new(file))?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Check version compatibility and required fields.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        let [major, minor, build] = self.version;
        if major != SUPPORTED_MAJOR {
            return Err(ArtifactError::UnsupportedVersion {
                major,
                minor,
                build,
            });
        }

        if self.seed.is_empty() {
            return Err(ArtifactError::InvalidField {
                field: "Seed",
                reason: "seed cannot be empty".to_string(),
            });
        }

        if self.name.is_empty() {
            return Err(ArtifactError::InvalidField {
                field: "Name",
                reason: "slot name cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"{
        "Version": [1, 0, 0],
        "Seed": "38291047561029384756",
        "Slot": 2,
        "Name": "Robo",
        "Locations": {
            "Kitchen - Fridge Top 10M Coin": {
                "player": 2, "name": "Coin C 4", "game": "Chibi Robo", "classification": "filler"
            },
            "Foyer - Drawer": {
                "name": "Nothing", "game": "Chibi Robo", "classification": "filler"
            }
        },
        "debug_menu": 0,
        "free_pjs": 1,
        "open_upstairs": true
    }"#;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_sample() {
        let file = write_temp(SAMPLE);
        let artifact = OutputArtifact::load(file.path()).unwrap();

        assert_eq!(artifact.seed, "38291047561029384756");
        assert_eq!(artifact.slot, 2);
        assert_eq!(artifact.locations.len(), 2);
        assert_eq!(artifact.locations["Foyer - Drawer"].player, None);
        assert_eq!(
            artifact.options,
            GameOptions {
                free_pjs: true,
                open_upstairs: true,
                ..GameOptions::default()
            }
        );
    }

    #[test]
    fn test_rejects_future_major_version() {
        let file = write_temp(&SAMPLE.replace("[1, 0, 0]", "[2, 0, 0]"));
        assert!(matches!(
            OutputArtifact::load(file.path()),
            Err(ArtifactError::UnsupportedVersion { major: 2, .. })
        ));
    }

    #[test]
    fn test_rejects_empty_seed() {
        let file = write_temp(&SAMPLE.replace("38291047561029384756", ""));
        assert!(matches!(
            OutputArtifact::load(file.path()),
            Err(ArtifactError::InvalidField { field: "Seed", .. })
        ));
    }

    #[test]
    fn test_rejects_bad_toggle() {
        let file = write_temp(&SAMPLE.replace("\"debug_menu\": 0", "\"debug_menu\": 7"));
        assert!(matches!(
            OutputArtifact::load(file.path()),
            Err(ArtifactError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = OutputArtifact::load(Path::new("/nonexistent/chibi.json")).unwrap_err();
        assert!(matches!(err, ArtifactError::ReadFailed { .. }));
    }
}
