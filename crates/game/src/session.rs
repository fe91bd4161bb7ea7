//! A headless play session: one simulation, its catalog, the audio pump and
//! the input script.

use crate::catalog::GameCatalog;
use crate::config::GameConfig;
use crate::level_file::{self, LoadedLevel, SpawnDesc};
use crate::script::Script;
use anyhow::Result;
use audio::{AudioSystem, LogSink};
use engine_core::Transform;
use physics::debug::{draw_hit, LineRecorder};
use physics::{Catalog, FrameReport, Object, ObjectKind, SimEvent, Simulation};
use std::path::Path;
use std::time::Duration;

/// How far the debug aim ray reaches.
const AIM_RANGE: f32 = 200.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub frames: u64,
    pub sounds: u64,
    pub robots_destroyed: u32,
    pub walls_destroyed: u32,
}

pub struct Session {
    sim: Simulation,
    catalog: Catalog,
    audio: AudioSystem,
    script: Script,
    player_weapon: String,
    level_name: String,
    stats: SessionStats,
    next_report: f32,
}

impl Session {
    pub fn new(config: &GameConfig, catalog: GameCatalog, level: LoadedLevel) -> Self {
        let (catalog, sounds) = catalog.into_parts();
        let sim = Simulation::new(level.level.clone(), config.sim.clone());
        let mut audio = AudioSystem::new(sim.sounds(), Box::new(LogSink::default()));
        audio.set_master_volume(config.volume);
        for entry in &sounds {
            audio.register(entry.id, &entry.name, entry.duration);
        }
        let mut session = Self {
            sim,
            catalog,
            audio,
            script: Script::new(config.script.clone()),
            player_weapon: config.player_weapon.clone(),
            level_name: String::new(),
            stats: SessionStats::default(),
            next_report: 0.0,
        };
        session.populate(level);
        session
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn level_name(&self) -> &str {
        &self.level_name
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Switch to the level at `path`. On failure the current level and its
    /// objects stay as they are.
    pub fn reload_level(&mut self, path: &Path) -> Result<()> {
        let loaded = level_file::load(path)?;
        self.sim.load_level(loaded.level.clone());
        self.populate(loaded);
        Ok(())
    }

    fn populate(&mut self, loaded: LoadedLevel) {
        self.level_name = loaded.name;
        let mut spawned = 0;
        for spawn in &loaded.spawns {
            if self.spawn(spawn).is_some() {
                spawned += 1;
            }
        }

        match self.spawn(&loaded.player_start) {
            Some(player) => self.sim.set_player(player),
            None => log::warn!("No player in {:?}; running without input", self.level_name),
        }
        match self.catalog.weapon(&self.player_weapon) {
            Some(weapon) => self.sim.set_player_weapon(weapon.clone()),
            None => log::warn!("Unknown player weapon {:?}", self.player_weapon),
        }
        log::info!(
            "Level {:?} ready: {} of {} objects spawned",
            self.level_name,
            spawned,
            loaded.spawns.len()
        );
    }

    fn spawn(&mut self, desc: &SpawnDesc) -> Option<engine_core::ObjectId> {
        let Some(template) = self.catalog.object(&desc.template) else {
            log::warn!("Unknown object template {:?}", desc.template);
            return None;
        };
        let object: Object =
            template.instantiate(desc.position, Transform::rotation_towards(desc.facing));
        match self.sim.spawn(object) {
            Ok(id) => Some(id),
            Err(e) => {
                log::warn!("Could not spawn {:?}: {}", desc.template, e);
                None
            }
        }
    }

    /// Run one render frame at session time `time`.
    pub fn frame(&mut self, time: f32, delta: Duration) -> FrameReport {
        let input = self.script.input_at(time);
        let report = self.sim.frame(delta, &input);
        if report.clamped {
            log::debug!(
                "Frame of {:.2} s exceeded the catch-up window; ran {} ticks",
                delta.as_secs_f32(),
                report.ticks
            );
        }
        self.stats.frames += 1;

        for event in self.sim.drain_events() {
            self.handle_event(&event);
        }
        let objects = self.sim.objects();
        let played = self.audio.pump(delta.as_secs_f32(), |id| objects.position(id));
        self.stats.sounds += played as u64;

        if time >= self.next_report {
            self.next_report = time + 1.0;
            self.report_player(report.alpha);
        }
        report
    }

    fn handle_event(&mut self, event: &SimEvent) {
        match event {
            SimEvent::WallHit {
                object, tag, speed, bounced, ..
            } => log::debug!(
                "{} hit {} at {:.1} u/s{}",
                object,
                tag,
                speed,
                if *bounced { " and bounced" } else { "" }
            ),
            SimEvent::ObjectHit {
                object,
                target,
                damage,
                ..
            } => log::info!("{} hit {} for {:.1}", object, target, damage),
            SimEvent::Explosion {
                segment,
                radius,
                affected,
                ..
            } => log::info!(
                "Explosion in {} (radius {:.1}) reached {} objects",
                segment,
                radius,
                affected
            ),
            SimEvent::WallDestroyed { tag } => {
                self.stats.walls_destroyed += 1;
                log::info!("Wall at {} blown open", tag);
            }
            SimEvent::Destroyed { kind, .. } => {
                if *kind == ObjectKind::Robot {
                    self.stats.robots_destroyed += 1;
                }
            }
            SimEvent::LeftLevel { object, position } => {
                log::info!("{} fell out of the level at {:?}", object, position)
            }
        }
    }

    /// Debug overlay stand-in: where the player is drawn and what it aims at.
    fn report_player(&mut self, alpha: f32) {
        let Some(player) = self.sim.player() else {
            return;
        };
        let Some(drawn) = self.sim.interpolated_transform(player, alpha) else {
            return;
        };
        let hit = self.sim.trace_ray(drawn.position, drawn.forward(), AIM_RANGE);
        let mut overlay = LineRecorder::default();
        draw_hit(&mut overlay, &hit, 1.0);
        match (hit.tag, hit.object) {
            (Some(tag), _) => log::debug!(
                "Player at {:?} aims at {} ({:.1} away, {} overlay lines)",
                drawn.position,
                tag,
                hit.distance,
                overlay.lines.len()
            ),
            (None, Some(target)) => log::debug!(
                "Player at {:?} aims at {} ({:.1} away)",
                drawn.position,
                target,
                hit.distance
            ),
            (None, None) => log::debug!("Player at {:?} aims at nothing", drawn.position),
        }
    }

    /// Log end-of-session totals.
    pub fn finish(&self) {
        self.sim.diagnostics().log_summary();
        log::info!(
            "Session over after {} frames: {} robots destroyed, {} walls destroyed, {} sounds played",
            self.stats.frames,
            self.stats.robots_destroyed,
            self.stats.walls_destroyed,
            self.stats.sounds
        );
    }
}
