//! Per-tick control input for the player-controlled object.
//!
//! Device sampling and key mapping live outside the engine; the simulation
//! only sees this normalized control vector.

use glam::Vec3;

/// Control vector applied at the start of a simulation tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlInput {
    /// Desired thrust in ship-local axes (x = right, y = up, z = back), each in `[-1, 1]`.
    pub thrust: Vec3,
    /// Desired turn rates (x = pitch, y = yaw, z = roll), each in `[-1, 1]`.
    pub turn: Vec3,
    /// Primary weapon trigger held.
    pub fire_primary: bool,
}

impl ControlInput {
    /// Idle input (no thrust, no turning, trigger released).
    pub fn idle() -> Self {
        Self::default()
    }

    /// Forward thrust at the given strength.
    pub fn forward(amount: f32) -> Self {
        Self {
            thrust: Vec3::new(0.0, 0.0, -amount),
            ..Default::default()
        }
    }

    /// Clamp every axis into `[-1, 1]`.
    pub fn clamped(self) -> Self {
        Self {
            thrust: self.thrust.clamp(Vec3::splat(-1.0), Vec3::splat(1.0)),
            turn: self.turn.clamp(Vec3::splat(-1.0), Vec3::splat(1.0)),
            fire_primary: self.fire_primary,
        }
    }
}
