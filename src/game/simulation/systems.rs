/// Fixed-tick systems of the drift simulation.

use bevy::prelude::*;
use crate::game::catalog::TerrainCatalog;
use crate::game::flow_field::FlowField;
use crate::game::grid::GridWorld;
use crate::game::simulation::buoyancy::BuoyancyStepper;
use crate::game::simulation::components::*;
use crate::game::simulation::resources::*;
use crate::profile_log;

pub fn increment_sim_tick(mut tick: ResMut<SimTick>) {
    tick.increment();
}

/// Push every buoyant actor along the current under it.
///
/// The displacement goes straight into the position and is remembered in
/// [`CurrentDrift`]; velocity is left alone so that integration can add the
/// actor's own motion on top.
pub fn apply_current_drift(
    grid: Res<GridWorld>,
    catalog: Res<TerrainCatalog>,
    sim_config: Res<SimConfig>,
    mut query: Query<(&mut SimPosition, &mut CurrentDrift), With<Buoyant>>,
) {
    let stepper = BuoyancyStepper::new(FlowField::new(&grid, &catalog), sim_config.speed_scale)
        .with_sampling(sim_config.flow_sampling);

    for (mut pos, mut drift) in query.iter_mut() {
        let displacement = stepper.step(pos.0, sim_config.tick_delta);
        drift.0 = displacement;
        if !displacement.is_zero() {
            pos.0 += displacement;
        }
    }
}

/// Apply velocity to position
pub fn apply_velocity(
    sim_config: Res<SimConfig>,
    mut query: Query<(&mut SimPosition, &SimVelocity)>,
) {
    for (mut pos, vel) in query.iter_mut() {
        if !vel.0.is_zero() {
            pos.0 += vel.0 * sim_config.tick_delta;
        }
    }
}

pub fn log_drift(
    tick: Res<SimTick>,
    sim_config: Res<SimConfig>,
    query: Query<(Entity, &SimPosition, &CurrentDrift), With<Buoyant>>,
) {
    profile_log!(tick, "[SIM STATUS] Tick: {} | Buoyant actors: {}", tick.0, query.iter().len());

    let interval = sim_config.drift_log_interval;
    if interval == 0 || tick.0 % interval != 0 {
        return;
    }
    for (entity, pos, drift) in query.iter() {
        let (x, y) = pos.0.floor_cell();
        let p = pos.0.to_vec2();
        let d = drift.0.to_vec2();
        info!(
            "[DRIFT] tick {} {:?} at ({:.2}, {:.2}) cell ({}, {}) drift ({:.3}, {:.3})",
            tick.0, entity, p.x, p.y, x, y, d.x, d.y
        );
    }
}
