//! The level grid: the single piece of mutable level state.
//!
//! Cells hold an optional resolved/placed tile and an optional paint colour.
//! Feature tiles (raft, rocks, currents, pickups, enemies...) are placed
//! explicitly by the author and tracked in a bitmask so the autotiler never
//! overwrites them. Everything else reads the grid through shared borrows.

use bevy::prelude::Resource;
use fixedbitset::FixedBitSet;

use crate::game::catalog::{PaintColor, TerrainCatalog, TerrainClass, TileId};
use crate::game::error::AuthoringError;
use crate::game::math::{FixedNum, FixedVec2};


#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    /// Placed or resolved tile; `None` means background / not yet resolved.
    pub tile: Option<TileId>,
    /// Terrain intent consumed by the autotiler.
    pub paint: Option<PaintColor>,
}

#[derive(Resource, Clone, Debug)]
pub struct GridWorld {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    features: FixedBitSet,
    resolved: bool,
}

impl GridWorld {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            cells: vec![Cell::default(); size],
            features: FixedBitSet::with_capacity(size),
            resolved: false,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Flat index of `(x, y)`, or `None` outside the grid.
    #[inline]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    #[inline]
    pub fn coords(&self, index: usize) -> (i32, i32) {
        ((index % self.width) as i32, (index / self.width) as i32)
    }

    #[inline]
    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    #[inline]
    pub fn tile_at(&self, x: i32, y: i32) -> Option<TileId> {
        self.cell(x, y).and_then(|c| c.tile)
    }

    #[inline]
    pub fn paint_at(&self, x: i32, y: i32) -> Option<PaintColor> {
        self.cell(x, y).and_then(|c| c.paint)
    }

    pub fn is_feature(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|i| self.features.contains(i))
    }

    /// True once a resolution pass has been committed.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Place an explicit feature tile.
    ///
    /// Before resolution a feature may be replaced freely. After a committed
    /// resolution an existing feature cell is locked.
    pub fn set_feature(&mut self, x: i32, y: i32, tile: TileId) -> Result<(), AuthoringError> {
        let index = self.index(x, y).ok_or(AuthoringError::OutOfBounds { x, y })?;
        if self.resolved && self.features.contains(index) {
            if let Some(existing) = self.cells[index].tile {
                return Err(AuthoringError::OccupiedFeature { x, y, tile: existing });
            }
        }
        self.cells[index].tile = Some(tile);
        self.features.insert(index);
        Ok(())
    }

    /// Mark the intended terrain region of a cell.
    ///
    /// Does not touch an already-resolved tile; call [`GridWorld::clear_resolved`]
    /// and resolve again after editing paint on a resolved level.
    pub fn set_paint(&mut self, x: i32, y: i32, color: PaintColor) -> Result<(), AuthoringError> {
        let index = self.index(x, y).ok_or(AuthoringError::OutOfBounds { x, y })?;
        self.cells[index].paint = Some(color);
        Ok(())
    }

    pub fn clear_paint(&mut self, x: i32, y: i32) -> Result<(), AuthoringError> {
        let index = self.index(x, y).ok_or(AuthoringError::OutOfBounds { x, y })?;
        self.cells[index].paint = None;
        Ok(())
    }

    /// Drop every autotiled tile, keeping features, so the paint layer can
    /// be resolved again from scratch.
    pub fn clear_resolved(&mut self) {
        for (index, cell) in self.cells.iter_mut().enumerate() {
            if !self.features.contains(index) {
                cell.tile = None;
            }
        }
        self.resolved = false;
    }

    /// Write a batch of resolved tiles. Only the resolver calls this, after
    /// it has computed the full assignment.
    pub(crate) fn commit_resolution(&mut self, assignments: &[(usize, TileId)]) {
        for &(index, tile) in assignments {
            debug_assert!(!self.features.contains(index), "resolver must not overwrite features");
            self.cells[index].tile = Some(tile);
        }
        self.resolved = true;
    }

    /// Raster-order iterator over `(x, y, cell)`.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, &Cell)> + '_ {
        self.cells.iter().enumerate().map(move |(i, cell)| {
            let (x, y) = self.coords(i);
            (x, y, cell)
        })
    }

    /// Centre of the first cell in raster order holding a Raft tile.
    pub fn raft_spawn(&self, catalog: &TerrainCatalog) -> Option<FixedVec2> {
        let half = FixedNum::from_num(0.5);
        self.iter()
            .find(|(_, _, cell)| {
                cell.tile
                    .and_then(|t| catalog.get(t))
                    .is_some_and(|def| def.class == TerrainClass::Raft)
            })
            .map(|(x, y, _)| FixedVec2::from_ints(x, y) + FixedVec2::new(half, half))
    }

    pub fn stats(&self, catalog: &TerrainCatalog) -> LevelStats {
        let mut stats = LevelStats::default();
        for cell in &self.cells {
            match cell.tile.and_then(|t| catalog.get(t)) {
                Some(def) => {
                    stats.class_counts[def.class.as_index()] += 1;
                    stats.total_wood = stats.total_wood.saturating_add(def.wood_value());
                }
                None if cell.paint.is_some() => stats.unresolved_painted += 1,
                None => {}
            }
        }
        stats
    }
}

/// Summary of what a level contains, logged after loading.
#[derive(Resource, Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelStats {
    /// Indexed by [`TerrainClass::as_index`].
    pub class_counts: [usize; 8],
    /// Sum of `tens * 10 + units` over every wood tile, saturating.
    pub total_wood: u64,
    pub unresolved_painted: usize,
}

impl LevelStats {
    pub fn count(&self, class: TerrainClass) -> usize {
        self.class_counts[class.as_index()]
    }
}
