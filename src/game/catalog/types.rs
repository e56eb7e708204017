use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::game::error::AuthoringError;

/// Small integer identifying a tile in the tileset.
pub type TileId = u32;

/// Inclusive magnitude range a current tile may carry.
pub const MIN_CURRENT_MAGNITUDE: u8 = 1;
pub const MAX_CURRENT_MAGNITUDE: u8 = 6;

/// Semantic class of a tile. Every tile belongs to exactly one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TerrainClass {
    Raft,
    Rock,
    Current,
    Wood,
    Treasure,
    Enemy,
    Goal,
    Siren,
}

impl TerrainClass {
    pub const ALL: [TerrainClass; 8] = [
        TerrainClass::Raft,
        TerrainClass::Rock,
        TerrainClass::Current,
        TerrainClass::Wood,
        TerrainClass::Treasure,
        TerrainClass::Enemy,
        TerrainClass::Goal,
        TerrainClass::Siren,
    ];

    #[inline]
    pub fn as_index(self) -> usize {
        self as usize
    }

    /// Only decorative terrain takes part in autotiling. Currents and the
    /// special tiles are always placed explicitly.
    #[inline]
    pub fn accepts_signature(self) -> bool {
        matches!(self, TerrainClass::Rock)
    }
}

/// Compass direction of a current, in grid space (y grows downward).
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassDirection {
    #[serde(alias = "N")]
    North,
    #[serde(alias = "NE")]
    NorthEast,
    #[serde(alias = "E")]
    East,
    #[serde(alias = "SE")]
    SouthEast,
    #[serde(alias = "S")]
    South,
    #[serde(alias = "SW")]
    SouthWest,
    #[serde(alias = "W")]
    West,
    #[serde(alias = "NW")]
    NorthWest,
}

impl CompassDirection {
    pub const ALL: [CompassDirection; 8] = [
        CompassDirection::North,
        CompassDirection::NorthEast,
        CompassDirection::East,
        CompassDirection::SouthEast,
        CompassDirection::South,
        CompassDirection::SouthWest,
        CompassDirection::West,
        CompassDirection::NorthWest,
    ];

    /// Raw grid offset for this direction. Diagonals are deliberately left
    /// unnormalized: (1, 1) and not (0.707, 0.707).
    #[inline]
    pub fn offset(self) -> (i32, i32) {
        match self {
            CompassDirection::North => (0, -1),
            CompassDirection::NorthEast => (1, -1),
            CompassDirection::East => (1, 0),
            CompassDirection::SouthEast => (1, 1),
            CompassDirection::South => (0, 1),
            CompassDirection::SouthWest => (-1, 1),
            CompassDirection::West => (-1, 0),
            CompassDirection::NorthWest => (-1, -1),
        }
    }

    /// Parse an authored direction label. Accepts the short compass form
    /// ("NE") and the long tileset form ("NORTH_EAST", "EAST_SOUTH").
    pub fn parse(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        let direction = match normalized.as_str() {
            "N" | "NORTH" => CompassDirection::North,
            "NE" | "NORTH_EAST" | "NORTHEAST" => CompassDirection::NorthEast,
            "E" | "EAST" => CompassDirection::East,
            "SE" | "SOUTH_EAST" | "SOUTHEAST" | "EAST_SOUTH" => CompassDirection::SouthEast,
            "S" | "SOUTH" => CompassDirection::South,
            "SW" | "SOUTH_WEST" | "SOUTHWEST" => CompassDirection::SouthWest,
            "W" | "WEST" => CompassDirection::West,
            "NW" | "NORTH_WEST" | "NORTHWEST" | "WEST_NORTH" => CompassDirection::NorthWest,
            _ => return None,
        };
        Some(direction)
    }
}

/// Class-specific parameters of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TilePayload {
    /// Raft, Rock, Treasure, Goal and Siren carry nothing.
    None,
    Current { direction: CompassDirection, magnitude: u8 },
    Wood { tens: i32, units: i32 },
    /// Opaque occupant marker, never interpreted here.
    Enemy { subtype: i32 },
}

impl TilePayload {
    /// Check that this payload fits `class`. Returns the reason on mismatch.
    pub fn check(&self, class: TerrainClass) -> Result<(), String> {
        match (class, self) {
            (TerrainClass::Current, TilePayload::Current { magnitude, .. }) => {
                if (MIN_CURRENT_MAGNITUDE..=MAX_CURRENT_MAGNITUDE).contains(magnitude) {
                    Ok(())
                } else {
                    Err(format!(
                        "magnitude {magnitude} outside [{MIN_CURRENT_MAGNITUDE}, {MAX_CURRENT_MAGNITUDE}]"
                    ))
                }
            }
            (TerrainClass::Wood, TilePayload::Wood { tens, units }) => {
                if *tens < 0 || *units < 0 {
                    Err(format!("negative wood component (tens {tens}, units {units})"))
                } else {
                    Ok(())
                }
            }
            (TerrainClass::Enemy, TilePayload::Enemy { .. }) => Ok(()),
            (
                TerrainClass::Raft
                | TerrainClass::Rock
                | TerrainClass::Treasure
                | TerrainClass::Goal
                | TerrainClass::Siren,
                TilePayload::None,
            ) => Ok(()),
            (class, payload) => Err(format!("payload {payload:?} does not belong to class {class:?}")),
        }
    }

    /// Build a payload from authored tile properties.
    ///
    /// Wood reads `tens` and `units` (each defaulting to 0), currents read
    /// `direction` and `magnitude`, enemies read `subtype` (default 0).
    pub fn from_properties(
        id: TileId,
        class: TerrainClass,
        properties: &BTreeMap<String, PropertyValue>,
    ) -> Result<Self, AuthoringError> {
        let invalid = |reason: String| AuthoringError::InvalidPayload { id, class, reason };
        let int_property = |key: &str| -> Result<Option<i64>, AuthoringError> {
            match properties.get(key) {
                None => Ok(None),
                Some(value) => value
                    .as_int()
                    .map(Some)
                    .ok_or_else(|| invalid(format!("property '{key}' is not an integer: {value:?}"))),
            }
        };

        let payload = match class {
            TerrainClass::Current => {
                let label = properties
                    .get("direction")
                    .ok_or_else(|| invalid("current is missing 'direction'".to_string()))?;
                let direction = label
                    .as_text()
                    .and_then(CompassDirection::parse)
                    .ok_or_else(|| invalid(format!("'{label:?}' is not a compass direction")))?;
                let magnitude = int_property("magnitude")?
                    .ok_or_else(|| invalid("current is missing 'magnitude'".to_string()))?;
                let magnitude = u8::try_from(magnitude)
                    .map_err(|_| invalid(format!("magnitude {magnitude} is out of range")))?;
                TilePayload::Current { direction, magnitude }
            }
            TerrainClass::Wood => {
                let tens = int_property("tens")?.unwrap_or(0);
                let units = int_property("units")?.unwrap_or(0);
                let narrow = |v: i64| {
                    i32::try_from(v).map_err(|_| invalid(format!("wood component {v} is out of range")))
                };
                TilePayload::Wood { tens: narrow(tens)?, units: narrow(units)? }
            }
            TerrainClass::Enemy => {
                let subtype = int_property("subtype")?.unwrap_or(0);
                let subtype = i32::try_from(subtype)
                    .map_err(|_| invalid(format!("enemy subtype {subtype} is out of range")))?;
                TilePayload::Enemy { subtype }
            }
            _ => TilePayload::None,
        };

        payload.check(class).map_err(invalid)?;
        Ok(payload)
    }
}

/// A single authored property value, as a tileset editor stores it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Int(i64),
    Text(String),
}

impl PropertyValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(v) => Some(*v),
            PropertyValue::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s.as_str()),
            PropertyValue::Int(_) => None,
        }
    }
}

/// Catalog entry for one tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileDefinition {
    pub id: TileId,
    pub class: TerrainClass,
    pub payload: TilePayload,
}

impl TileDefinition {
    /// Wood value as `tens * 10 + units`, zero for every other class.
    /// Any pair of `i32` components fits in a `u64`.
    pub fn wood_value(&self) -> u64 {
        match self.payload {
            TilePayload::Wood { tens, units } => tens.max(0) as u64 * 10 + units.max(0) as u64,
            _ => 0,
        }
    }

    /// Direction and magnitude, present iff the tile is a current.
    pub fn current(&self) -> Option<(CompassDirection, u8)> {
        match self.payload {
            TilePayload::Current { direction, magnitude } => Some((direction, magnitude)),
            _ => None,
        }
    }
}
