//! Tile catalog: what every tile id means.
//!
//! The catalog is populated once per level load (tile definitions first, then
//! wang sets and their corner signatures) and frozen before resolution. Freezing
//! builds one signature -> tile table per wang set so the resolver matches a
//! required signature with a single hash lookup instead of scanning the tileset.

use bevy::log::debug;
use bevy::prelude::Resource;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::collections::BTreeMap;

use crate::game::error::AuthoringError;

mod types;
mod wang;


pub use types::{
    CompassDirection, PropertyValue, TerrainClass, TileDefinition, TileId, TilePayload,
    MAX_CURRENT_MAGNITUDE, MIN_CURRENT_MAGNITUDE,
};
pub use wang::{Corner, CornerSignature, PaintColor, WangColor, WangSet, WangSetId};

/// Corner signature attached to a tile, with the set it belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WangTile {
    pub set: WangSetId,
    pub signature: CornerSignature,
}

/// Registry of tile semantics, owned by the level and passed by reference to
/// everything that needs it.
#[derive(Resource, Default, Debug)]
pub struct TerrainCatalog {
    // BTreeMap keeps iteration in id order, which freeze() relies on.
    tiles: BTreeMap<TileId, TileDefinition>,
    wang_tiles: FxHashMap<TileId, WangTile>,
    wang_sets: Vec<WangSet>,
    signature_tables: Vec<FxHashMap<CornerSignature, TileId>>,
    frozen: bool,
}

impl TerrainCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(
        &mut self,
        id: TileId,
        class: TerrainClass,
        payload: TilePayload,
    ) -> Result<(), AuthoringError> {
        if self.frozen {
            return Err(AuthoringError::CatalogFrozen(format!("tile {id}")));
        }
        if self.tiles.contains_key(&id) {
            return Err(AuthoringError::DuplicateId(id));
        }
        payload
            .check(class)
            .map_err(|reason| AuthoringError::InvalidPayload { id, class, reason })?;

        self.tiles.insert(id, TileDefinition { id, class, payload });
        Ok(())
    }

    /// Declare a palette. `colors` are numbered from 1 in the given order and
    /// earlier colours dominate later ones at shared corners.
    pub fn define_wang_set(
        &mut self,
        name: &str,
        colors: &[&str],
        background: &str,
    ) -> Result<WangSetId, AuthoringError> {
        if self.frozen {
            return Err(AuthoringError::CatalogFrozen(format!("wang set '{name}'")));
        }
        if self.wang_sets.iter().any(|s| s.name == name) {
            return Err(AuthoringError::DuplicateWangSet(name.to_string()));
        }
        let invalid = |reason: String| AuthoringError::InvalidSignature { set: name.to_string(), reason };
        if colors.is_empty() || colors.len() > u8::MAX as usize {
            return Err(invalid(format!("palette must declare 1..=255 colours, got {}", colors.len())));
        }

        let set = WangSet {
            name: name.to_string(),
            colors: colors.iter().map(|c| c.to_string()).collect::<SmallVec<_>>(),
            background: WangColor::EMPTY,
        };
        let background = set
            .color_named(background)
            .ok_or_else(|| invalid(format!("background '{background}' is not in the palette")))?;

        let id = WangSetId(self.wang_sets.len() as u16);
        self.wang_sets.push(WangSet { background, ..set });
        Ok(id)
    }

    pub fn define_wang_tile(
        &mut self,
        set: WangSetId,
        tile: TileId,
        signature: CornerSignature,
    ) -> Result<(), AuthoringError> {
        if self.frozen {
            return Err(AuthoringError::CatalogFrozen(format!("signature of tile {tile}")));
        }
        let class = self.lookup(tile)?.class;
        let wang_set = self.wang_sets.get(set.0 as usize).ok_or_else(|| AuthoringError::InvalidSignature {
            set: format!("#{}", set.0),
            reason: "wang set is not defined".to_string(),
        })?;
        if !class.accepts_signature() {
            return Err(AuthoringError::InvalidSignature {
                set: wang_set.name.clone(),
                reason: format!("tile {tile} is a {class:?} tile, only terrain tiles carry corner signatures"),
            });
        }
        if let Some(bad) = signature.0.iter().find(|c| !wang_set.contains(**c)) {
            return Err(AuthoringError::InvalidSignature {
                set: wang_set.name.clone(),
                reason: format!("tile {tile}: colour {} is not in the palette", bad.0),
            });
        }
        if self.wang_tiles.contains_key(&tile) {
            return Err(AuthoringError::DuplicateWangTile(tile));
        }

        self.wang_tiles.insert(tile, WangTile { set, signature });
        Ok(())
    }

    /// Lock the catalog and build the signature lookup tables.
    pub fn freeze(&mut self) {
        if self.frozen {
            return;
        }
        let mut tables = vec![FxHashMap::default(); self.wang_sets.len()];
        // Ascending id order, so the first insert per signature is the lowest id.
        for id in self.tiles.keys() {
            if let Some(wang) = self.wang_tiles.get(id) {
                tables[wang.set.0 as usize].entry(wang.signature).or_insert(*id);
            }
        }
        for (set, table) in self.wang_sets.iter().zip(&tables) {
            debug!("Wang set '{}': {} distinct signatures", set.name, table.len());
        }
        self.signature_tables = tables;
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn lookup(&self, id: TileId) -> Result<&TileDefinition, AuthoringError> {
        self.tiles.get(&id).ok_or(AuthoringError::UnknownTile(id))
    }

    /// Non-failing lookup for the per-tick read path.
    #[inline]
    pub fn get(&self, id: TileId) -> Option<&TileDefinition> {
        self.tiles.get(&id)
    }

    pub fn wang_tile(&self, id: TileId) -> Option<&WangTile> {
        self.wang_tiles.get(&id)
    }

    pub fn wang_set(&self, set: WangSetId) -> Option<&WangSet> {
        self.wang_sets.get(set.0 as usize)
    }

    pub fn wang_set_named(&self, name: &str) -> Option<(WangSetId, &WangSet)> {
        self.wang_sets
            .iter()
            .enumerate()
            .find(|(_, s)| s.name == name)
            .map(|(i, s)| (WangSetId(i as u16), s))
    }

    /// Resolve a "set / colour" name pair into a paint colour.
    pub fn paint_named(&self, set: &str, color: &str) -> Option<PaintColor> {
        let (id, wang_set) = self.wang_set_named(set)?;
        wang_set.color_named(color).map(|c| PaintColor::new(id, c))
    }

    /// Lowest tile id carrying exactly `signature` in `set`.
    /// Always `None` until the catalog is frozen.
    #[inline]
    pub fn match_signature(&self, set: WangSetId, signature: &CornerSignature) -> Option<TileId> {
        self.signature_tables.get(set.0 as usize)?.get(signature).copied()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TileDefinition> {
        self.tiles.values()
    }
}
