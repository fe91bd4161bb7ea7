//! Object/weapon catalog and sound names, loaded from RON.

use anyhow::{Context, Result};
use audio::SoundId;
use physics::{Catalog, ObjectTemplate, WeaponDefinition};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("../../../data/catalog.ron");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundEntry {
    pub id: SoundId,
    pub name: String,
    /// Playback length in seconds; attached sounds stop following after it.
    #[serde(default = "default_duration")]
    pub duration: f32,
}

fn default_duration() -> f32 {
    audio::DEFAULT_DURATION
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameCatalog {
    #[serde(default)]
    pub sounds: Vec<SoundEntry>,
    #[serde(default)]
    pub objects: Vec<ObjectTemplate>,
    #[serde(default)]
    pub weapons: Vec<WeaponDefinition>,
}

impl GameCatalog {
    pub fn parse(data: &str) -> Result<Self> {
        let catalog: Self = ron::from_str(data).context("parsing catalog")?;
        catalog.check_sounds();
        Ok(catalog)
    }

    /// Warn about weapons that reference sounds nobody registered.
    fn check_sounds(&self) {
        let known: HashSet<SoundId> = self.sounds.iter().map(|s| s.id).collect();
        for weapon in &self.weapons {
            let used = [weapon.fire_sound, weapon.impact_sound, weapon.bounce_sound];
            for id in used.into_iter().flatten() {
                if !known.contains(&id) {
                    log::warn!("Weapon {} uses unregistered sound {}", weapon.name, id);
                }
            }
        }
    }

    /// Split into the simulation's catalog and the sound table.
    pub fn into_parts(self) -> (Catalog, Vec<SoundEntry>) {
        (
            Catalog {
                objects: self.objects,
                weapons: self.weapons,
            },
            self.sounds,
        )
    }
}

pub fn load(path: &Path) -> Result<GameCatalog> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading catalog {}", path.display()))?;
    GameCatalog::parse(&data).with_context(|| format!("loading catalog {}", path.display()))
}

/// The catalog shipped with the binary.
pub fn builtin() -> Result<GameCatalog> {
    GameCatalog::parse(BUILTIN_CATALOG).context("loading built-in catalog")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_player_and_weapons() {
        let (catalog, sounds) = builtin().unwrap().into_parts();
        assert!(catalog.object("player").is_some());
        assert!(catalog.weapon("laser").is_some());
        assert!(!sounds.is_empty());
    }

    #[test]
    fn sections_are_optional() {
        let catalog = GameCatalog::parse("(weapons: [(name: \"pea\", speed: 10.0, lifetime: 1.0, damage: 1.0)])").unwrap();
        assert!(catalog.sounds.is_empty());
        assert_eq!(catalog.weapons[0].name, "pea");
    }

    #[test]
    fn sound_duration_defaults_when_missing() {
        let catalog = GameCatalog::parse(
            "(sounds: [(id: 1, name: \"zap\"), (id: 2, name: \"boom\", duration: 2.5)])",
        )
        .unwrap();
        assert_eq!(catalog.sounds[0].duration, audio::DEFAULT_DURATION);
        assert_eq!(catalog.sounds[1].duration, 2.5);
    }

    #[test]
    fn malformed_catalog_is_an_error() {
        assert!(GameCatalog::parse("(objects: 3)").is_err());
    }
}
