/// Component definitions for the drift simulation.

use bevy::prelude::*;
use crate::game::math::FixedVec2;

// ============================================================================
// Position & Motion
// ============================================================================

/// Logical position in fractional grid coordinates (cell `(i, j)` spans
/// `[i, i + 1) × [j, j + 1)`).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct SimPosition(pub FixedVec2);

/// Player- or physics-driven velocity in grid units per second.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct SimVelocity(pub FixedVec2);

// ============================================================================
// Currents
// ============================================================================

/// Marker for actors pushed around by current tiles (the raft).
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Buoyant;

/// Displacement the currents applied on the most recent tick.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct CurrentDrift(pub FixedVec2);
