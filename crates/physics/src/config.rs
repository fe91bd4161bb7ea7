//! Simulation settings. Deserialized from the `sim` section of the game's
//! `config.ron`; every field falls back to its default when missing.

use crate::explosion::Occlusion;
use engine_core::{tick_duration, DEFAULT_MAX_ACCUMULATED, DEFAULT_TICK_RATE};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Fixed simulation rate in Hz.
    #[serde(default = "default_tick_rate")]
    pub tick_rate: f64,
    /// Upper bound on time carried into a frame after a stall, in seconds.
    #[serde(default = "default_max_accumulated")]
    pub max_accumulated: f64,
    /// Fraction of the normal velocity kept when bouncing.
    #[serde(default = "default_restitution")]
    pub restitution: f32,
    /// Acceleration applied to objects flagged `GRAVITY`.
    #[serde(default)]
    pub gravity: Vec3,
    /// Object arena capacity.
    #[serde(default = "default_max_objects")]
    pub max_objects: usize,
    /// What solid walls do to explosions behind them.
    #[serde(default)]
    pub occlusion: Occlusion,
    /// Seed for debris scatter.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Player thrust force at full input.
    #[serde(default = "default_player_thrust")]
    pub player_thrust: f32,
    /// Player turn rate at full input, radians per second.
    #[serde(default = "default_player_turn_rate")]
    pub player_turn_rate: f32,
    /// Debris pieces thrown when a robot is destroyed.
    #[serde(default = "default_debris_count")]
    pub debris_count: u32,
}

fn default_tick_rate() -> f64 {
    DEFAULT_TICK_RATE
}
fn default_max_accumulated() -> f64 {
    DEFAULT_MAX_ACCUMULATED.as_secs_f64()
}
fn default_restitution() -> f32 {
    1.0
}
fn default_max_objects() -> usize {
    350
}
fn default_seed() -> u64 {
    0x1f3e_2d4c
}
fn default_player_thrust() -> f32 {
    60.0
}
fn default_player_turn_rate() -> f32 {
    std::f32::consts::PI
}
fn default_debris_count() -> u32 {
    4
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: default_tick_rate(),
            max_accumulated: default_max_accumulated(),
            restitution: default_restitution(),
            gravity: Vec3::ZERO,
            max_objects: default_max_objects(),
            occlusion: Occlusion::default(),
            seed: default_seed(),
            player_thrust: default_player_thrust(),
            player_turn_rate: default_player_turn_rate(),
            debris_count: default_debris_count(),
        }
    }
}

impl SimConfig {
    /// Duration of one tick in seconds.
    pub fn timestep(&self) -> f32 {
        (1.0 / self.sanitized_tick_rate()) as f32
    }

    pub fn max_accumulated_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.max_accumulated.max(0.0)).unwrap_or(DEFAULT_MAX_ACCUMULATED)
    }

    /// Tick rate with nonsense values replaced by the default.
    pub fn sanitized_tick_rate(&self) -> f64 {
        if tick_duration(self.tick_rate).is_some() {
            self.tick_rate
        } else {
            log::warn!("Invalid tick rate {}, using {}", self.tick_rate, DEFAULT_TICK_RATE);
            DEFAULT_TICK_RATE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let config: SimConfig = ron::from_str("(restitution: 0.5)").unwrap();
        assert_eq!(config.restitution, 0.5);
        assert_eq!(config.tick_rate, 64.0);
        assert_eq!(config.max_objects, 350);
        assert_eq!(config.occlusion, Occlusion::Block);
        assert_eq!(config.max_accumulated_duration(), Duration::from_secs(2));
    }

    #[test]
    fn gravity_and_occlusion_parse() {
        let config: SimConfig =
            ron::from_str("(gravity: (0.0, -9.8, 0.0), occlusion: Muffle)").unwrap();
        assert_eq!(config.gravity, Vec3::new(0.0, -9.8, 0.0));
        assert_eq!(config.occlusion, Occlusion::Muffle);
    }

    #[test]
    fn bad_tick_rate_falls_back() {
        let config = SimConfig {
            tick_rate: 0.0,
            ..Default::default()
        };
        assert_eq!(config.sanitized_tick_rate(), 64.0);
        assert!((config.timestep() - 1.0 / 64.0).abs() < 1e-9);
    }

    #[test]
    fn tick_rate_without_a_representable_tick_falls_back() {
        for tick_rate in [1e-20, 1e20] {
            let config = SimConfig {
                tick_rate,
                ..Default::default()
            };
            assert_eq!(config.sanitized_tick_rate(), 64.0);
        }
    }
}
