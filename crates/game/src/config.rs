//! Session configuration (simulation tuning, data paths, scripted input). Loaded from config.ron at startup.

use crate::script::ScriptStep;
use physics::SimConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Persistent session settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Physics tuning.
    #[serde(default)]
    pub sim: SimConfig,
    /// Level description file.
    #[serde(default = "default_level_path")]
    pub level_path: PathBuf,
    /// Object template and weapon catalog.
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,
    /// Simulated seconds to run before exiting.
    #[serde(default = "default_session_seconds")]
    pub session_seconds: f32,
    /// Simulated render frame rate; frame deltas are `1 / frame_rate`.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f32,
    /// Pretend the host stalled for this long at the session midpoint.
    #[serde(default)]
    pub stall_seconds: f32,
    /// Catalog weapon given to the player.
    #[serde(default = "default_weapon")]
    pub player_weapon: String,
    /// Master volume (0.0 to 1.0).
    #[serde(default = "default_volume")]
    pub volume: f32,
    /// Scripted player input; overlapping steps add.
    #[serde(default = "default_script")]
    pub script: Vec<ScriptStep>,
}

fn default_level_path() -> PathBuf {
    PathBuf::from("data/level.ron")
}
fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/catalog.ron")
}
fn default_session_seconds() -> f32 {
    10.0
}
fn default_frame_rate() -> f32 {
    60.0
}
fn default_weapon() -> String {
    "laser".to_string()
}
fn default_volume() -> f32 {
    1.0
}
fn default_script() -> Vec<ScriptStep> {
    vec![
        ScriptStep {
            start: 0.5,
            duration: 2.0,
            thrust: 0.5,
            ..Default::default()
        },
        ScriptStep {
            start: 1.0,
            duration: 3.0,
            fire: true,
            ..Default::default()
        },
        ScriptStep {
            start: 4.0,
            duration: 1.0,
            yaw: 0.5,
            ..Default::default()
        },
        ScriptStep {
            start: 5.0,
            duration: 2.0,
            thrust: 1.0,
            fire: true,
            ..Default::default()
        },
    ]
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            sim: SimConfig::default(),
            level_path: default_level_path(),
            catalog_path: default_catalog_path(),
            session_seconds: default_session_seconds(),
            frame_rate: default_frame_rate(),
            stall_seconds: 0.0,
            player_weapon: default_weapon(),
            volume: default_volume(),
            script: default_script(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is invalid, returns default config;
    /// if it is missing, also writes the defaults there for editing.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(data) => match Self::parse(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            },
            Err(_) => {
                log::info!("No config at {:?}, writing defaults", path);
                Self::default().save();
            }
        }
        Self::default()
    }

    fn parse(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(e) = std::fs::write(&path, s) {
                log::warn!("Could not write config to {:?}: {}", path, e);
            }
        }
    }

    /// Frame delta in seconds, falling back to 60 fps on a bad rate.
    pub fn frame_seconds(&self) -> f32 {
        if self.frame_rate.is_finite() && self.frame_rate > 0.0 {
            1.0 / self.frame_rate
        } else {
            log::warn!("Frame rate {} is not usable, using 60", self.frame_rate);
            1.0 / 60.0
        }
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}
