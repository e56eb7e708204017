use bevy::prelude::*;
use bevy_common_assets::ron::RonAssetPlugin;
use serde::{Deserialize, Serialize};

use crate::game::flow_field::FlowSampling;

pub const INITIAL_CONFIG_PATH: &str = "assets/initial_config.ron";

/// Static configuration loaded once at startup. These values shape the
/// simulation itself (tick rate, how currents are read, which level to load)
/// and are not changed while a level is playing.
#[derive(Resource, Deserialize, Serialize, Clone, Debug)]
#[serde(default)]
pub struct InitialConfig {
    // Simulation (deterministic, must not change mid-level)
    pub tick_rate: f64,
    pub current_speed_scale: f32,
    pub flow_sampling: FlowSampling,

    // Level selection, relative to the working directory
    pub catalog_path: String,
    pub level_path: String,

    /// The raft's own velocity at spawn, in cells per second.
    pub raft_velocity: (f32, f32),

    /// Stop the headless run after this many fixed ticks; 0 runs forever.
    pub run_ticks: u64,
}

impl Default for InitialConfig {
    fn default() -> Self {
        Self {
            tick_rate: 20.0,
            current_speed_scale: 1.0,
            flow_sampling: FlowSampling::Nearest,
            catalog_path: "assets/catalog.ron".to_string(),
            level_path: "assets/levels/lagoon.ron".to_string(),
            raft_velocity: (0.0, 0.0),
            run_ticks: 0,
        }
    }
}

impl InitialConfig {
    pub fn from_ron_str(contents: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(contents)
    }
}

/// Runtime configuration that can be hot-reloaded during play.
/// Changing the speed scale mid-level alters the raft's trajectory but not
/// the level itself.
#[derive(Deserialize, Serialize, Asset, TypePath, Clone, Debug)]
pub struct GameConfig {
    pub current_speed_scale: f32,
    /// Log buoyant actors every N ticks; 0 disables.
    pub drift_log_interval: u64,
}

#[derive(Resource)]
pub struct GameConfigHandle(pub Handle<GameConfig>);

pub struct GameConfigPlugin;

impl Plugin for GameConfigPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RonAssetPlugin::<GameConfig>::new(&["game_config.ron"]))
           .add_systems(Startup, (load_initial_config, setup_runtime_config).chain());
    }
}

/// Load static initial configuration synchronously at startup.
/// This must complete before any game state that depends on these values.
/// A config inserted before startup (tests, embedding apps) is kept as is.
pub fn load_initial_config(mut commands: Commands, existing: Option<Res<InitialConfig>>) {
    if existing.is_some() {
        info!("InitialConfig provided by the app, skipping {}", INITIAL_CONFIG_PATH);
        return;
    }

    match std::fs::read_to_string(INITIAL_CONFIG_PATH) {
        Ok(contents) => {
            match InitialConfig::from_ron_str(&contents) {
                Ok(config) => {
                    info!("Loaded initial config from {}", INITIAL_CONFIG_PATH);
                    commands.insert_resource(config);
                }
                Err(e) => {
                    error!("Failed to parse initial config: {}", e);
                    error!("Using default InitialConfig");
                    commands.insert_resource(InitialConfig::default());
                }
            }
        }
        Err(e) => {
            error!("Failed to read {}: {}", INITIAL_CONFIG_PATH, e);
            error!("Using default InitialConfig");
            commands.insert_resource(InitialConfig::default());
        }
    }
}

/// Load runtime configuration asynchronously (can be hot-reloaded).
fn setup_runtime_config(mut commands: Commands, asset_server: Res<AssetServer>) {
    let handle = asset_server.load("game_config.ron");
    commands.insert_resource(GameConfigHandle(handle));
}
