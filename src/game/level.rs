//! Level files: the tileset catalog and the painted level layout, both RON.
//!
//! ```ron
//! // catalog
//! (
//!     tiles: [(id: 3, class: Current, properties: {"direction": "E", "magnitude": 2})],
//!     wang_sets: [(name: "Land Set", colors: ["Land", "Sea"], background: "Sea",
//!                  tiles: [(tile: 34, wang_id: "0,1,0,1,0,1,0,1")])],
//! )
//! // level
//! (
//!     width: 4, height: 2,
//!     boundary: (set: "Land Set", color: "Sea"),
//!     legend: {'#': (set: "Land Set", color: "Land"), '~': (set: "Land Set", color: "Sea")},
//!     paint: ["~##~", "~~~~"],
//!     features: [(x: 0, y: 1, tile: 0)],
//! )
//! ```
//!
//! Loading is synchronous and all-or-nothing: any failure is reported as a
//! [`LevelError`] and nothing is handed to the game.

use std::collections::BTreeMap;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::game::catalog::{
    CornerSignature, PaintColor, PropertyValue, TerrainCatalog, TerrainClass, TileId, TilePayload,
};
use crate::game::error::{AuthoringError, LevelError};
use crate::game::grid::GridWorld;
use crate::game::resolver::{CornerWangResolver, ResolveReport};

/// Paint characters that leave a cell unpainted.
pub const UNPAINTED: [char; 2] = ['.', ' '];

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CatalogData {
    pub tiles: Vec<TileData>,
    #[serde(default)]
    pub wang_sets: Vec<WangSetData>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TileData {
    pub id: TileId,
    pub class: TerrainClass,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct WangSetData {
    pub name: String,
    pub colors: Vec<String>,
    pub background: String,
    pub tiles: Vec<WangTileData>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct WangTileData {
    pub tile: TileId,
    pub wang_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PaintRef {
    pub set: String,
    pub color: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FeatureData {
    pub x: i32,
    pub y: i32,
    pub tile: TileId,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LevelData {
    pub width: usize,
    pub height: usize,
    pub boundary: PaintRef,
    #[serde(default)]
    pub legend: BTreeMap<char, PaintRef>,
    #[serde(default)]
    pub paint: Vec<String>,
    #[serde(default)]
    pub features: Vec<FeatureData>,
}

/// Background colour of the loaded level, used for out-of-grid corners.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelBoundary(pub PaintColor);

/// Everything a successful load produces.
#[derive(Debug)]
pub struct LoadedLevel {
    pub catalog: TerrainCatalog,
    pub grid: GridWorld,
    pub boundary: PaintColor,
    pub report: ResolveReport,
}

fn read_ron<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, LevelError> {
    let display = path.display().to_string();
    let contents = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
        path: display.clone(),
        source,
    })?;
    ron::from_str(&contents).map_err(|source| LevelError::Parse { path: display, source })
}

pub fn load_catalog(path: impl AsRef<Path>) -> Result<TerrainCatalog, LevelError> {
    let data: CatalogData = read_ron(path.as_ref())?;
    build_catalog(&data)
}

/// Read, build and resolve a level. The returned catalog is frozen and the
/// grid fully resolved.
pub fn load_level(
    catalog_path: impl AsRef<Path>,
    level_path: impl AsRef<Path>,
) -> Result<LoadedLevel, LevelError> {
    let catalog = load_catalog(catalog_path)?;
    let data: LevelData = read_ron(level_path.as_ref())?;
    let (mut grid, boundary) = build_grid(&data, &catalog)?;
    let report = CornerWangResolver::resolve(&mut grid, &catalog, boundary)?;
    Ok(LoadedLevel { catalog, grid, boundary, report })
}

/// Define every tile and wang set, then freeze.
pub fn build_catalog(data: &CatalogData) -> Result<TerrainCatalog, LevelError> {
    let mut catalog = TerrainCatalog::new();
    for tile in &data.tiles {
        let payload = TilePayload::from_properties(tile.id, tile.class, &tile.properties)?;
        catalog.define(tile.id, tile.class, payload)?;
    }

    for set_data in &data.wang_sets {
        let colors: Vec<&str> = set_data.colors.iter().map(String::as_str).collect();
        let set = catalog.define_wang_set(&set_data.name, &colors, &set_data.background)?;
        for wang_tile in &set_data.tiles {
            let signature = CornerSignature::from_wang_id(&wang_tile.wang_id).map_err(|reason| {
                AuthoringError::InvalidSignature {
                    set: set_data.name.clone(),
                    reason: format!("tile {}: {reason}", wang_tile.tile),
                }
            })?;
            catalog.define_wang_tile(set, wang_tile.tile, signature)?;
        }
    }

    catalog.freeze();
    debug!(
        "Catalog built: {} tiles, {} wang sets",
        catalog.len(),
        data.wang_sets.len()
    );
    Ok(catalog)
}

/// Lay out paint and features on a fresh grid. Does not resolve.
pub fn build_grid(data: &LevelData, catalog: &TerrainCatalog) -> Result<(GridWorld, PaintColor), LevelError> {
    if data.width == 0 || data.height == 0 {
        return Err(LevelError::Malformed(format!(
            "grid must be at least 1x1, got {}x{}",
            data.width, data.height
        )));
    }
    if data.paint.len() > data.height {
        return Err(LevelError::Malformed(format!(
            "{} paint rows for a grid of height {}",
            data.paint.len(),
            data.height
        )));
    }

    let resolve_paint = |paint: &PaintRef| {
        catalog.paint_named(&paint.set, &paint.color).ok_or_else(|| {
            LevelError::Malformed(format!("unknown paint colour '{}' in wang set '{}'", paint.color, paint.set))
        })
    };
    let boundary = resolve_paint(&data.boundary)?;
    let legend = data
        .legend
        .iter()
        .map(|(symbol, paint)| Ok((*symbol, resolve_paint(paint)?)))
        .collect::<Result<BTreeMap<char, PaintColor>, LevelError>>()?;

    let mut grid = GridWorld::new(data.width, data.height);
    for (y, row) in data.paint.iter().enumerate() {
        let row_width = row.chars().count();
        if row_width > data.width {
            return Err(LevelError::Malformed(format!(
                "paint row {y} is {row_width} cells wide, grid width is {}",
                data.width
            )));
        }
        for (x, symbol) in row.chars().enumerate() {
            if UNPAINTED.contains(&symbol) {
                continue;
            }
            let paint = legend.get(&symbol).copied().ok_or_else(|| {
                LevelError::Malformed(format!("paint symbol '{symbol}' at ({x}, {y}) is not in the legend"))
            })?;
            grid.set_paint(x as i32, y as i32, paint)?;
        }
    }

    for feature in &data.features {
        catalog.lookup(feature.tile)?;
        grid.set_feature(feature.x, feature.y, feature.tile)?;
    }

    Ok((grid, boundary))
}
