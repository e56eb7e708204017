/// Configuration initialization systems
///
/// Systems that handle loading and updating simulation configuration from:
/// - InitialConfig (loaded at startup from initial_config.ron)
/// - GameConfig (hot-reloadable runtime settings from game_config.ron)

use bevy::prelude::*;
use crate::game::config::{GameConfig, GameConfigHandle, InitialConfig};
use crate::game::math::FixedNum;

use crate::game::simulation::resources::*;

/// Initialize SimConfig from InitialConfig at startup
pub fn init_sim_config_from_initial(
    mut fixed_time: ResMut<Time<Fixed>>,
    mut sim_config: ResMut<SimConfig>,
    initial_config: Option<Res<InitialConfig>>,
) {
    let default_config = InitialConfig::default();
    let config = match &initial_config {
        Some(cfg) => cfg.as_ref(),
        None => {
            warn!("InitialConfig not found, using defaults");
            &default_config
        }
    };

    let tick_rate = if config.tick_rate > 0.0 {
        config.tick_rate
    } else {
        warn!("Invalid tick_rate {}, falling back to {}", config.tick_rate, default_config.tick_rate);
        default_config.tick_rate
    };

    fixed_time.set_timestep_seconds(1.0 / tick_rate);

    sim_config.tick_rate = tick_rate;
    sim_config.tick_delta = FixedNum::from_num(1.0 / tick_rate);
    sim_config.speed_scale = FixedNum::from_num(config.current_speed_scale);
    sim_config.flow_sampling = config.flow_sampling;

    info!(
        "SimConfig initialized: {} Hz, speed scale {}, {:?} sampling",
        sim_config.tick_rate, config.current_speed_scale, sim_config.flow_sampling
    );
}

/// Handle hot-reloadable runtime configuration
pub fn update_sim_from_runtime_config(
    config_handle: Option<Res<GameConfigHandle>>,
    game_configs: Res<Assets<GameConfig>>,
    mut sim_config: ResMut<SimConfig>,
    mut events: MessageReader<AssetEvent<GameConfig>>,
) {
    let Some(config_handle) = config_handle else {
        events.clear();
        return;
    };
    for event in events.read() {
        if event.is_modified(config_handle.0.id()) || event.is_loaded_with_dependencies(config_handle.0.id()) {
            if let Some(config) = game_configs.get(&config_handle.0) {
                apply_runtime_config(&mut sim_config, config);
                info!(
                    "Runtime config loaded/updated: speed scale {}, drift log every {} ticks",
                    config.current_speed_scale, config.drift_log_interval
                );
            }
        }
    }
}

pub fn apply_runtime_config(sim_config: &mut SimConfig, config: &GameConfig) {
    sim_config.speed_scale = FixedNum::from_num(config.current_speed_scale);
    sim_config.drift_log_interval = config.drift_log_interval;
}
