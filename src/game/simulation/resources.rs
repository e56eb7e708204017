/// Resource definitions for the drift simulation.

use bevy::prelude::*;
use crate::game::flow_field::FlowSampling;
use crate::game::math::FixedNum;

/// Number of fixed ticks simulated since the level started playing.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimTick(pub u64);

impl SimTick {
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

/// Simulation parameters in fixed-point form.
///
/// Filled once from [`InitialConfig`](crate::game::config::InitialConfig) at
/// startup; `speed_scale` and `drift_log_interval` are overwritten again
/// whenever the hot-reloadable `GameConfig` asset changes. Floats never reach
/// the stepper: the conversion happens here and only here.
#[derive(Resource, Debug, Clone)]
pub struct SimConfig {
    pub tick_rate: f64,
    /// Seconds per fixed tick.
    pub tick_delta: FixedNum,
    /// Grid units per second per unit of current magnitude.
    pub speed_scale: FixedNum,
    pub flow_sampling: FlowSampling,
    /// Log raft drift every N ticks; 0 disables.
    pub drift_log_interval: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: 20.0,
            tick_delta: FixedNum::from_num(1) / FixedNum::from_num(20),
            speed_scale: FixedNum::from_num(1),
            flow_sampling: FlowSampling::Nearest,
            drift_log_interval: 0,
        }
    }
}
