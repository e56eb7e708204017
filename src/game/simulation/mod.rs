/// Simulation layer - deterministic drift of buoyant actors.
///
/// This module is organized into:
/// - **components**: Position, velocity and drift components
/// - **resources**: Fixed-point config and the tick counter
/// - **buoyancy**: The pure current stepper
/// - **systems**: Fixed-tick drift, integration and logging
/// - **systems_config**: Startup and hot-reload config plumbing

use bevy::prelude::*;
use crate::game::GameState;

// Module declarations
pub mod components;
pub mod resources;
pub mod buoyancy;
pub mod systems;
pub mod systems_config;

// Re-export commonly used items
pub use components::*;
pub use resources::*;
pub use buoyancy::BuoyancyStepper;

// System sets for organizing execution order
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum SimSet {
    Drift,      // Forced displacement from currents
    Integration // Applying velocity to position
}

/// Main simulation plugin
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Configure FixedUpdate timestep (overwritten from InitialConfig)
        app.insert_resource(Time::<Fixed>::from_hz(20.0));

        app.init_resource::<SimConfig>();
        app.init_resource::<SimTick>();

        // Configure System Sets
        app.configure_sets(FixedUpdate, (
            SimSet::Drift,
            SimSet::Integration,
        ).chain().run_if(in_state(GameState::Playing)));

        // Startup systems
        app.add_systems(Startup, systems_config::init_sim_config_from_initial
            .after(crate::game::config::load_initial_config));

        // Update systems (run in all states)
        app.add_systems(Update, systems_config::update_sim_from_runtime_config);

        // Fixed update systems (deterministic simulation)
        app.add_systems(FixedUpdate, (
            systems::increment_sim_tick.before(SimSet::Drift),
            systems::apply_current_drift.in_set(SimSet::Drift),
            systems::apply_velocity.in_set(SimSet::Integration),
            systems::log_drift.after(SimSet::Integration),
        ).run_if(in_state(GameState::Playing)));
    }
}
