//! Scripted player input for headless sessions.

use engine_core::{ControlInput, Vec3};
use serde::{Deserialize, Serialize};

/// One timed input window. Overlapping windows combine: axes add, the trigger ORs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptStep {
    /// Session time in seconds at which the step starts.
    pub start: f32,
    pub duration: f32,
    /// Forward thrust in `[-1, 1]`.
    pub thrust: f32,
    /// Yaw rate in `[-1, 1]`, positive turns left.
    pub yaw: f32,
    pub fire: bool,
}

impl ScriptStep {
    fn active(&self, time: f32) -> bool {
        time >= self.start && time < self.start + self.duration
    }
}

/// Input timeline sampled once per frame.
#[derive(Debug, Clone, Default)]
pub struct Script {
    steps: Vec<ScriptStep>,
}

impl Script {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self { steps }
    }

    pub fn input_at(&self, time: f32) -> ControlInput {
        let mut input = ControlInput::idle();
        for step in self.steps.iter().filter(|s| s.active(time)) {
            // Ship forward is -Z.
            input.thrust += Vec3::new(0.0, 0.0, -step.thrust);
            input.turn += Vec3::new(0.0, step.yaw, 0.0);
            input.fire_primary |= step.fire;
        }
        input.clamped()
    }

    /// Time at which the last step ends.
    pub fn end(&self) -> f32 {
        self.steps
            .iter()
            .map(|s| s.start + s.duration)
            .fold(0.0, f32::max)
    }
}
