use serde::{Deserialize, Serialize};

use crate::game::catalog::TerrainCatalog;
use crate::game::grid::GridWorld;
use crate::game::math::{FixedNum, FixedVec2};

/// Displacement a current cell imparts, in raw compass units × magnitude.
///
/// Diagonals are not normalized: a SE current of magnitude 3 is `(3, 3)`,
/// √2 faster than an E current of the same magnitude.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowVector {
    pub dx: i32,
    pub dy: i32,
}

impl FlowVector {
    pub const ZERO: Self = Self { dx: 0, dy: 0 };

    pub fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    pub fn is_zero(self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    pub fn to_fixed(self) -> FixedVec2 {
        FixedVec2::from_ints(self.dx, self.dy)
    }
}

/// How the drift stepper reads the field at a continuous position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowSampling {
    /// Vector of the cell containing the position.
    #[default]
    Nearest,
    /// Distance-weighted blend of the four nearest cell centres.
    Bilinear,
}

/// Read-only view of the current layer of a resolved grid.
///
/// Nothing is cached: every query reads the cell's tile and looks its
/// payload up in the catalog, both O(1). Any `(x, y)` is a valid query;
/// cells outside the grid, empty cells and non-current tiles all read as
/// [`FlowVector::ZERO`].
///
/// # Example
///
/// ```rust,ignore
/// let field = FlowField::new(&grid, &catalog);
/// let v = field.vector_at(5, 5); // (3, 0) for an E current of magnitude 3
/// ```
#[derive(Clone, Copy)]
pub struct FlowField<'a> {
    grid: &'a GridWorld,
    catalog: &'a TerrainCatalog,
}

impl<'a> FlowField<'a> {
    pub fn new(grid: &'a GridWorld, catalog: &'a TerrainCatalog) -> Self {
        Self { grid, catalog }
    }

    #[inline]
    pub fn vector_at(&self, x: i32, y: i32) -> FlowVector {
        let Some(def) = self.grid.tile_at(x, y).and_then(|t| self.catalog.get(t)) else {
            return FlowVector::ZERO;
        };
        match def.current() {
            Some((direction, magnitude)) => {
                let (ux, uy) = direction.offset();
                let m = magnitude as i32;
                FlowVector::new(ux * m, uy * m)
            }
            None => FlowVector::ZERO,
        }
    }

    /// Field value at a continuous position in grid units.
    pub fn sample(&self, position: FixedVec2, sampling: FlowSampling) -> FixedVec2 {
        match sampling {
            FlowSampling::Nearest => {
                let (x, y) = position.floor_cell();
                self.vector_at(x, y).to_fixed()
            }
            FlowSampling::Bilinear => self.sample_bilinear(position),
        }
    }

    /// Blend the four cell-centre vectors surrounding `position`.
    ///
    /// Cell `(i, j)` has its centre at `(i + 0.5, j + 0.5)`. Cells outside the
    /// grid contribute zero, so the field fades out towards the border
    /// instead of clamping.
    fn sample_bilinear(&self, position: FixedVec2) -> FixedVec2 {
        let half = FixedNum::from_num(0.5);
        let one = FixedNum::from_num(1);
        let shifted = FixedVec2::new(position.x - half, position.y - half);
        let (x0, y0) = shifted.floor_cell();
        let tx = shifted.x - shifted.x.floor();
        let ty = shifted.y - shifted.y.floor();

        let corners = [
            (x0, y0, (one - tx) * (one - ty)),
            (x0.saturating_add(1), y0, tx * (one - ty)),
            (x0, y0.saturating_add(1), (one - tx) * ty),
            (x0.saturating_add(1), y0.saturating_add(1), tx * ty),
        ];

        let mut sum = FixedVec2::ZERO;
        for (x, y, weight) in corners {
            let v = self.vector_at(x, y);
            if !v.is_zero() && weight != FixedNum::ZERO {
                sum += v.to_fixed() * weight;
            }
        }
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::{CompassDirection, TerrainClass, TilePayload};

    fn catalog() -> TerrainCatalog {
        let mut catalog = TerrainCatalog::new();
        for (i, direction) in CompassDirection::ALL.into_iter().enumerate() {
            catalog
                .define(100 + i as u32, TerrainClass::Current, TilePayload::Current { direction, magnitude: 3 })
                .unwrap();
        }
        catalog.define(7, TerrainClass::Rock, TilePayload::None).unwrap();
        catalog.freeze();
        catalog
    }

    #[test]
    fn test_cardinal_and_diagonal_vectors() {
        let catalog = catalog();
        let mut grid = GridWorld::new(10, 10);
        grid.set_feature(5, 5, 102).unwrap(); // E
        grid.set_feature(6, 5, 103).unwrap(); // SE
        let field = FlowField::new(&grid, &catalog);

        assert_eq!(field.vector_at(5, 5), FlowVector::new(3, 0));
        assert_eq!(field.vector_at(6, 5), FlowVector::new(3, 3));
    }

    #[test]
    fn test_compass_mapping_for_all_directions() {
        let catalog = catalog();
        let mut grid = GridWorld::new(8, 1);
        for i in 0..8 {
            grid.set_feature(i, 0, 100 + i as u32).unwrap();
        }
        let field = FlowField::new(&grid, &catalog);
        let expected = [(0, -3), (3, -3), (3, 0), (3, 3), (0, 3), (-3, 3), (-3, 0), (-3, -3)];
        for (i, (dx, dy)) in expected.into_iter().enumerate() {
            assert_eq!(field.vector_at(i as i32, 0), FlowVector::new(dx, dy), "direction #{i}");
        }
    }

    #[test]
    fn test_vector_at_is_total() {
        let catalog = catalog();
        let mut grid = GridWorld::new(3, 3);
        grid.set_feature(1, 1, 7).unwrap();
        grid.set_feature(0, 0, 999).unwrap(); // not in the catalog
        let field = FlowField::new(&grid, &catalog);

        for (x, y) in [(-1, -1), (3, 0), (0, 3), (i32::MIN, i32::MAX), (1, 1), (2, 2), (0, 0)] {
            assert_eq!(field.vector_at(x, y), FlowVector::ZERO, "({x}, {y})");
        }
    }

    #[test]
    fn test_nearest_sampling_uses_floor() {
        let catalog = catalog();
        let mut grid = GridWorld::new(4, 4);
        grid.set_feature(1, 2, 104).unwrap(); // S
        let field = FlowField::new(&grid, &catalog);

        let inside = FixedVec2::from_f32(1.99, 2.01);
        assert_eq!(field.sample(inside, FlowSampling::Nearest), FixedVec2::from_ints(0, 3));
        let outside = FixedVec2::from_f32(2.0, 2.5);
        assert_eq!(field.sample(outside, FlowSampling::Nearest), FixedVec2::ZERO);
    }

    #[test]
    fn test_bilinear_sampling_blends_cell_centres() {
        let catalog = catalog();
        let mut grid = GridWorld::new(4, 1);
        grid.set_feature(1, 0, 102).unwrap(); // E, (3, 0)
        let field = FlowField::new(&grid, &catalog);

        // Exactly at the centre: full strength
        let centre = FixedVec2::from_f32(1.5, 0.5);
        assert_eq!(field.sample(centre, FlowSampling::Bilinear), FixedVec2::from_ints(3, 0));

        // Halfway to the empty neighbour centre: half strength
        let halfway = FixedVec2::from_f32(2.0, 0.5);
        assert_eq!(field.sample(halfway, FlowSampling::Bilinear), FixedVec2::from_f32(1.5, 0.0));

        // Far away: nothing
        let far = FixedVec2::from_f32(-20.0, 40.0);
        assert_eq!(field.sample(far, FlowSampling::Bilinear), FixedVec2::ZERO);
    }
}
