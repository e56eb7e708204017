use crate::game::flow_field::{FlowField, FlowSampling};
use crate::game::math::{FixedNum, FixedVec2};

/// Forced displacement of a floating actor.
///
/// `step` is a pure function of the field, the position and `dt`:
/// `flow(position) * speed_scale * dt`. The result is meant to be *added* to
/// whatever else moves the actor that tick; it never replaces player or
/// physics motion.
///
/// Positions outside the grid read a zero field, so `step` never fails.
#[derive(Clone, Copy)]
pub struct BuoyancyStepper<'a> {
    field: FlowField<'a>,
    speed_scale: FixedNum,
    sampling: FlowSampling,
}

impl<'a> BuoyancyStepper<'a> {
    pub fn new(field: FlowField<'a>, speed_scale: FixedNum) -> Self {
        Self { field, speed_scale, sampling: FlowSampling::Nearest }
    }

    pub fn with_sampling(mut self, sampling: FlowSampling) -> Self {
        self.sampling = sampling;
        self
    }

    /// Grid units per second at `position`.
    pub fn velocity_at(&self, position: FixedVec2) -> FixedVec2 {
        self.field.sample(position, self.sampling) * self.speed_scale
    }

    pub fn step(&self, position: FixedVec2, dt: FixedNum) -> FixedVec2 {
        let velocity = self.velocity_at(position);
        if velocity.is_zero() {
            return FixedVec2::ZERO;
        }
        velocity * dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::{CompassDirection, TerrainCatalog, TerrainClass, TilePayload};
    use crate::game::grid::GridWorld;

    fn setup() -> (TerrainCatalog, GridWorld) {
        let mut catalog = TerrainCatalog::new();
        catalog
            .define(3, TerrainClass::Current, TilePayload::Current { direction: CompassDirection::East, magnitude: 3 })
            .unwrap();
        catalog
            .define(6, TerrainClass::Current, TilePayload::Current { direction: CompassDirection::NorthWest, magnitude: 2 })
            .unwrap();
        catalog.define(7, TerrainClass::Rock, TilePayload::None).unwrap();
        catalog.freeze();

        let mut grid = GridWorld::new(6, 6);
        grid.set_feature(5, 5, 3).unwrap();
        grid.set_feature(1, 1, 6).unwrap();
        grid.set_feature(2, 2, 7).unwrap();
        (catalog, grid)
    }

    #[test]
    fn test_step_scales_flow_by_speed_and_dt() {
        let (catalog, grid) = setup();
        let stepper = BuoyancyStepper::new(FlowField::new(&grid, &catalog), FixedNum::from_num(2));

        let pos = FixedVec2::from_f32(5.25, 5.75);
        assert_eq!(stepper.step(pos, FixedNum::from_num(0.5)), FixedVec2::from_ints(3, 0));

        let diagonal = FixedVec2::from_f32(1.5, 1.5);
        assert_eq!(stepper.step(diagonal, FixedNum::from_num(1)), FixedVec2::from_ints(-4, -4));
    }

    #[test]
    fn test_zero_displacement_without_current() {
        let (catalog, grid) = setup();
        let stepper = BuoyancyStepper::new(FlowField::new(&grid, &catalog), FixedNum::from_num(5));
        let dt = FixedNum::from_num(0.05);

        for (x, y) in [(0.5, 0.5), (2.5, 2.5), (-3.0, 1.0), (100.0, 100.0), (6.0, 5.5)] {
            assert_eq!(stepper.step(FixedVec2::from_f32(x, y), dt), FixedVec2::ZERO, "({x}, {y})");
        }
    }

    #[test]
    fn test_split_steps_add_up() {
        let (catalog, grid) = setup();
        let stepper = BuoyancyStepper::new(FlowField::new(&grid, &catalog), FixedNum::from_num(1.5));
        let pos = FixedVec2::from_f32(5.5, 5.5);
        let dt1 = FixedNum::from_num(0.25);
        let dt2 = FixedNum::from_num(0.5);

        let whole = stepper.step(pos, dt1 + dt2);
        let split = stepper.step(pos, dt1) + stepper.step(pos, dt2);
        assert_eq!(whole, split);
        assert_eq!(whole, FixedVec2::from_f32(3.375, 0.0));
    }

    #[test]
    fn test_bilinear_stepper_reads_blended_field() {
        let (catalog, grid) = setup();
        let stepper = BuoyancyStepper::new(FlowField::new(&grid, &catalog), FixedNum::from_num(1))
            .with_sampling(FlowSampling::Bilinear);

        // Halfway between (5, 5) and the border on the x axis
        let pos = FixedVec2::from_f32(6.0, 5.5);
        assert_eq!(stepper.step(pos, FixedNum::from_num(1)), FixedVec2::from_f32(1.5, 0.0));
    }
}
