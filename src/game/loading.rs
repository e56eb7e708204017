use bevy::prelude::*;

use crate::game::catalog::TerrainClass;
use crate::game::config::{load_initial_config, InitialConfig};
use crate::game::level::{load_level, LevelBoundary, LoadedLevel};
use crate::game::math::FixedVec2;
use crate::game::simulation::{Buoyant, CurrentDrift, SimPosition, SimTick, SimVelocity};
use crate::game::GameState;

pub struct LoadingPlugin;

/// Why the last level load failed. Present only in [`GameState::Failed`].
#[derive(Resource, Debug, Clone)]
pub struct LevelLoadError(pub String);

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Raft;

impl Plugin for LoadingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, begin_loading.after(load_initial_config));
        app.add_systems(OnEnter(GameState::Loading), load_configured_level);
        app.add_systems(OnEnter(GameState::Playing), reset_sim_tick);
    }
}

fn begin_loading(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::Loading);
}

fn load_configured_level(
    mut commands: Commands,
    initial_config: Option<Res<InitialConfig>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let default_config = InitialConfig::default();
    let config = initial_config.as_deref().unwrap_or(&default_config);
    info!("Loading level {} with catalog {}", config.level_path, config.catalog_path);

    match load_level(&config.catalog_path, &config.level_path) {
        Ok(level) => {
            commands.remove_resource::<LevelLoadError>();
            let (vx, vy) = config.raft_velocity;
            install_level(&mut commands, level, FixedVec2::from_f32(vx, vy));
            next_state.set(GameState::Playing);
        }
        Err(e) => {
            error!("Failed to load level {}: {}", config.level_path, e);
            commands.insert_resource(LevelLoadError(e.to_string()));
            next_state.set(GameState::Failed);
        }
    }
}

/// Hand a loaded level to the world: grid, catalog and boundary become
/// resources and the raft is spawned at its start cell moving at
/// `raft_velocity`.
pub fn install_level(commands: &mut Commands, level: LoadedLevel, raft_velocity: FixedVec2) {
    let LoadedLevel { catalog, grid, boundary, report } = level;
    let stats = grid.stats(&catalog);
    info!(
        "Level ready: {}x{} grid, {} cells autotiled, {} currents, {} wood worth {}",
        grid.width(),
        grid.height(),
        report.resolved,
        stats.count(TerrainClass::Current),
        stats.count(TerrainClass::Wood),
        stats.total_wood
    );

    match grid.raft_spawn(&catalog) {
        Some(spawn) => {
            commands.spawn((
                Name::new("Raft"),
                Raft,
                Buoyant,
                SimPosition(spawn),
                SimVelocity(raft_velocity),
                CurrentDrift::default(),
            ));
        }
        None => warn!("Level has no raft tile, nothing will drift"),
    }

    commands.insert_resource(stats);
    commands.insert_resource(LevelBoundary(boundary));
    commands.insert_resource(grid);
    commands.insert_resource(catalog);
}

fn reset_sim_tick(mut tick: ResMut<SimTick>) {
    *tick = SimTick::default();
}
