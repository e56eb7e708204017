use bevy::prelude::*;

pub mod catalog;
pub mod config;
pub mod error;
pub mod flow_field;
pub mod grid;
pub mod level;
pub mod loading;
pub mod math;
pub mod resolver;
pub mod simulation;

use config::{GameConfigPlugin, InitialConfig};
use loading::{LevelLoadError, LoadingPlugin};
use simulation::{SimTick, SimulationPlugin};

#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    #[default]
    Boot,
    Loading,
    Playing,
    Failed,
}

/// Everything except the app shell: config, level loading and the drift
/// simulation. Needs `StatesPlugin`, `AssetPlugin` and a time source.
pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .add_plugins((GameConfigPlugin, SimulationPlugin, LoadingPlugin))
            .add_systems(FixedUpdate, exit_after_run_ticks
                .after(simulation::SimSet::Integration)
                .run_if(in_state(GameState::Playing)))
            .add_systems(OnEnter(GameState::Failed), exit_on_failure);
    }
}

fn exit_after_run_ticks(
    tick: Res<SimTick>,
    initial_config: Option<Res<InitialConfig>>,
    mut exit: MessageWriter<AppExit>,
) {
    let Some(config) = initial_config else { return };
    if config.run_ticks > 0 && tick.0 >= config.run_ticks {
        info!("Reached {} ticks, exiting", tick.0);
        exit.write(AppExit::Success);
    }
}

fn exit_on_failure(error: Option<Res<LevelLoadError>>, mut exit: MessageWriter<AppExit>) {
    let reason = error.map(|e| e.0.clone()).unwrap_or_default();
    error!("Level failed to load, shutting down: {}", reason);
    exit.write(AppExit::error());
}
