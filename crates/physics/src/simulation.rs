//! The simulation context: level, objects, clock and pending work for one
//! session. Owned by the caller and driven one frame at a time.

use crate::config::SimConfig;
use crate::debug::Diagnostics;
use crate::events::SimEvent;
use crate::explosion::{self, GameExplosion};
use crate::hit::LevelHit;
use crate::integrator::{self, apply_force, Contact, StepParams};
use crate::level::{Level, SegId, Tag, WallKind};
use crate::object::{
    Movement, Object, ObjectKind, ObjectPool, PhysicsData, PhysicsFlags, SpawnError, WeaponInfo,
};
use crate::template::WeaponDefinition;
use crate::traversal::{intersect_level, visible, Ray, RayQuery, TraversalStats};
use audio::{SoundQueue, SoundRequest};
use engine_core::{ControlInput, ObjectId, Time, Transform, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// What one call to [`Simulation::frame`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub ticks: u32,
    /// Leftover tick fraction in `[0, 1)` for render interpolation.
    pub alpha: f32,
    /// The frame delta overflowed the catch-up window.
    pub clamped: bool,
}

pub struct Simulation {
    level: Level,
    objects: ObjectPool,
    config: SimConfig,
    params: StepParams,
    time: Time,
    diagnostics: Diagnostics,
    events: Vec<SimEvent>,
    sounds: SoundQueue,
    explosions: Vec<GameExplosion>,
    wall_damage: Vec<(Tag, f32)>,
    player: Option<ObjectId>,
    player_weapon: Option<WeaponDefinition>,
    fire_cooldown: f32,
    rng: StdRng,
}

impl Simulation {
    pub fn new(level: Level, config: SimConfig) -> Self {
        let time = Time::with_rate(config.sanitized_tick_rate(), config.max_accumulated_duration());
        log::info!(
            "Simulation at {} Hz (at most {} ticks per frame), {} segments, capacity {} objects",
            config.sanitized_tick_rate(),
            time.max_ticks_per_frame(),
            level.segment_count(),
            config.max_objects
        );
        Self {
            objects: ObjectPool::new(config.max_objects),
            params: StepParams::from_config(&config),
            rng: StdRng::seed_from_u64(config.seed),
            level,
            config,
            time,
            diagnostics: Diagnostics::default(),
            events: Vec::new(),
            sounds: SoundQueue::new(),
            explosions: Vec::new(),
            wall_damage: Vec::new(),
            player: None,
            player_weapon: None,
            fire_cooldown: 0.0,
        }
    }

    /// Replace the level. Objects belong to the old level and are dropped.
    pub fn load_level(&mut self, level: Level) {
        log::info!(
            "Loaded level: {} segments, {} walls ({} objects dropped)",
            level.segment_count(),
            level.walls().len(),
            self.objects.len()
        );
        self.level = level;
        self.objects.clear();
        self.player = None;
        self.explosions.clear();
        self.wall_damage.clear();
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn objects(&self) -> &ObjectPool {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut ObjectPool {
        &mut self.objects
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Handle for the audio side to drain.
    pub fn sounds(&self) -> SoundQueue {
        self.sounds.clone()
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn player(&self) -> Option<ObjectId> {
        self.player
    }

    pub fn set_player(&mut self, id: ObjectId) {
        self.player = Some(id);
    }

    pub fn set_player_weapon(&mut self, weapon: WeaponDefinition) {
        self.player_weapon = Some(weapon);
        self.fire_cooldown = 0.0;
    }

    /// Insert an object, locating its segment from its position.
    pub fn spawn(&mut self, mut object: Object) -> Result<ObjectId, SpawnError> {
        let position = object.position();
        let segment = self
            .level
            .find_segment(position, object.segment)
            .ok_or(SpawnError::OutsideLevel { position })?;
        object.segment = Some(segment);
        object.last_transform = object.transform;
        let kind = object.kind;
        let id = self.objects.spawn(object)?;
        log::debug!("Spawned {} ({:?}) in {}", id, kind, segment);
        Ok(id)
    }

    /// Fire `weapon` from `shooter` along its forward axis.
    pub fn spawn_weapon(
        &mut self,
        weapon: &WeaponDefinition,
        shooter: ObjectId,
    ) -> Result<ObjectId, SpawnError> {
        let Some(source) = self.objects.snapshot(shooter) else {
            return Err(SpawnError::MissingParent(shooter));
        };
        let position = source.position();
        let mut shot = weapon
            .instantiate(position, source.transform.forward(), Some(shooter))
            .ok_or(SpawnError::OutsideLevel { position })?;
        shot.segment = source.segment;
        let id = self.spawn(shot)?;
        if let Some(sound) = weapon.fire_sound {
            self.sounds.push(SoundRequest::attached(sound, position, shooter));
        }
        Ok(id)
    }

    /// Queue an explosion for the next tick.
    pub fn queue_explosion(&mut self, explosion: GameExplosion) {
        self.explosions.push(explosion);
    }

    /// Returns false if the object is gone or not physics-driven.
    pub fn apply_force(&mut self, id: ObjectId, force: Vec3) -> bool {
        match self.objects.get_mut(id) {
            Some(object) => apply_force(object, force),
            None => {
                log::warn!("Force applied to missing object {}", id);
                false
            }
        }
    }

    /// Damage a destroyable wall now. Call between frames only.
    pub fn damage_wall(&mut self, tag: Tag, amount: f32) -> bool {
        let destroyed = self.level.damage_wall(tag, amount);
        if destroyed {
            self.events.push(SimEvent::WallDestroyed { tag });
        }
        destroyed
    }

    pub fn set_door(&mut self, tag: Tag, open: bool) -> bool {
        self.level.set_door(tag, open)
    }

    /// Cast a ray from a point, hitting geometry and objects.
    pub fn trace_ray(&mut self, origin: Vec3, direction: Vec3, max_distance: f32) -> LevelHit {
        let mut hit = LevelHit::default();
        let (Some(ray), Some(start)) = (
            Ray::new(origin, direction),
            self.level.find_segment(origin, None),
        ) else {
            return hit;
        };
        let query = RayQuery::new(start, max_distance).with_objects(None);
        let mut stats = TraversalStats::default();
        intersect_level(&self.level, Some(&self.objects), &ray, &query, &mut hit, &mut stats);
        self.diagnostics.record_traversal(&stats);
        hit
    }

    /// Line of sight between two objects.
    pub fn can_see(&self, from: ObjectId, to: ObjectId) -> bool {
        let (Some(a), Some(b)) = (self.objects.get(from), self.objects.get(to)) else {
            return false;
        };
        match a.segment {
            Some(seg) => visible(&self.level, a.position(), seg, b.position()),
            None => false,
        }
    }

    /// Render transform of an object between the previous and current tick.
    pub fn interpolated_transform(&self, id: ObjectId, alpha: f32) -> Option<Transform> {
        self.objects.get(id).map(|o| o.interpolated(alpha))
    }

    /// Feed one frame's elapsed time and run the ticks it pays for.
    pub fn frame(&mut self, delta: Duration, input: &ControlInput) -> FrameReport {
        let clamped = self.time.advance(delta);
        self.diagnostics.frames += 1;
        if clamped {
            self.diagnostics.clamped_frames += 1;
        }
        let mut ticks = 0;
        while self.time.should_fixed_update() {
            self.tick(input);
            ticks += 1;
        }
        FrameReport {
            ticks,
            alpha: self.time.alpha(),
            clamped,
        }
    }

    /// Run exactly one fixed tick.
    pub fn tick(&mut self, input: &ControlInput) {
        let dt = self.params.dt;
        let mut stats = TraversalStats::default();

        self.apply_input(input, dt);

        let step = integrator::step_objects(&self.level, &mut self.objects, &self.params, &mut stats);
        for id in step.left_level {
            if let Some(object) = self.objects.get(id) {
                self.events.push(SimEvent::LeftLevel {
                    object: id,
                    position: object.position(),
                });
            }
        }
        for contact in step.contacts {
            self.resolve_contact(contact);
        }
        self.run_explosions(&mut stats);

        for (tag, amount) in std::mem::take(&mut self.wall_damage) {
            if self.level.damage_wall(tag, amount) {
                self.events.push(SimEvent::WallDestroyed { tag });
            }
        }

        for (_, object) in self.objects.iter_mut() {
            object.lifespan.update(dt);
        }
        let removed = self.objects.reap();
        if let Some(player) = self.player {
            if removed.contains(&player) {
                log::info!("Player {} removed", player);
                self.player = None;
            }
        }

        self.diagnostics.ticks += 1;
        self.diagnostics.record_traversal(&stats);
        log::trace!(
            "Tick {}: {} objects, {} queries, {} segments visited",
            self.diagnostics.ticks,
            self.objects.len(),
            stats.queries,
            stats.segments_visited
        );
    }

    fn apply_input(&mut self, input: &ControlInput, dt: f32) {
        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
        let Some(id) = self.player else {
            return;
        };
        let input = input.clamped();
        let thrust = self.config.player_thrust;
        let turn_rate = self.config.player_turn_rate;
        let Some(player) = self.objects.get_mut(id) else {
            log::warn!("Player {} no longer exists, ignoring input", id);
            self.player = None;
            return;
        };
        let rotation = player.transform.rotation;
        if let Some(data) = player.physics_mut() {
            data.thrust = rotation * (input.thrust * thrust);
            data.angular_velocity = rotation * (input.turn * turn_rate);
        }

        if input.fire_primary && self.fire_cooldown <= 0.0 {
            if let Some(weapon) = self.player_weapon.clone() {
                match self.spawn_weapon(&weapon, id) {
                    Ok(_) => self.fire_cooldown = weapon.fire_delay,
                    Err(e) => log::warn!("Could not fire {}: {}", weapon.name, e),
                }
            }
        }
    }

    fn resolve_contact(&mut self, contact: Contact) {
        let Contact { object: id, hit } = contact;
        let Some(object) = self.objects.snapshot(id) else {
            return;
        };
        if object.is_dead() {
            return;
        }
        if let Some(tag) = hit.tag {
            self.diagnostics.wall_hits += 1;
            self.events.push(SimEvent::WallHit {
                object: id,
                tag,
                point: hit.point,
                normal: hit.normal,
                speed: hit.speed,
                bounced: hit.bounced,
            });
            if let Some(weapon) = object.weapon {
                if hit.bounced {
                    if let Some(sound) = weapon.bounce_sound {
                        self.sounds.push(SoundRequest::at(sound, hit.point));
                    }
                } else {
                    if matches!(
                        self.level.wall(tag).map(|w| w.kind),
                        Some(WallKind::Destroyable { .. })
                    ) {
                        self.wall_damage.push((tag, weapon.damage));
                    }
                    self.detonate(id, &object, weapon, hit.point);
                }
            }
        } else if let Some(target) = hit.object {
            self.diagnostics.object_hits += 1;
            let damage = object.weapon.map_or(0.0, |w| w.damage);
            self.events.push(SimEvent::ObjectHit {
                object: id,
                target,
                point: hit.point,
                damage,
            });
            match self.objects.get_mut(target) {
                Some(victim) => {
                    if !victim.health.is_invulnerable() && victim.health.take_damage(damage) {
                        self.destroy(target);
                    }
                }
                None => log::warn!("{} hit {}, which no longer exists", id, target),
            }
            if let Some(weapon) = object.weapon {
                let piercing = object
                    .physics()
                    .is_some_and(|p| p.flags.contains(PhysicsFlags::PIERCING));
                if !piercing {
                    self.detonate(id, &object, weapon, hit.point);
                }
            }
        }
    }

    /// Kill a weapon on impact and set off its splash damage.
    fn detonate(&mut self, id: ObjectId, object: &Object, weapon: WeaponInfo, impact: Vec3) {
        if let Some(shot) = self.objects.get_mut(id) {
            shot.kill();
        }
        if let Some(sound) = weapon.impact_sound {
            self.sounds.push(SoundRequest::at(sound, impact));
        }
        let Some(splash) = weapon.splash else {
            return;
        };
        // The shot rests just off the surface it struck, inside a segment.
        let Some(segment) = object.segment else {
            return;
        };
        self.explosions.push(GameExplosion {
            position: object.position(),
            segment,
            radius: splash.radius,
            damage: splash.damage,
            force: splash.force,
            source: Some(id),
            sound: None,
        });
    }

    fn run_explosions(&mut self, stats: &mut TraversalStats) {
        for blast in std::mem::take(&mut self.explosions) {
            let report = explosion::propagate(&self.level, &self.objects, &blast, self.config.occlusion, stats);
            let killed = explosion::apply(&mut self.objects, &report);
            self.diagnostics.explosions += 1;
            if let Some(sound) = blast.sound {
                self.sounds.push(SoundRequest::at(sound, blast.position));
            }
            self.events.push(SimEvent::Explosion {
                position: blast.position,
                segment: blast.segment,
                radius: blast.radius,
                affected: report.effects.len(),
            });
            self.wall_damage.extend(report.walls);
            for id in killed {
                self.destroy(id);
            }
        }
    }

    fn destroy(&mut self, id: ObjectId) {
        let Some(object) = self.objects.get_mut(id) else {
            return;
        };
        object.kill();
        let (kind, position, segment) = (object.kind, object.position(), object.segment);
        log::info!("{} ({:?}) destroyed at {:?}", id, kind, position);
        self.events.push(SimEvent::Destroyed {
            object: id,
            kind,
            position,
        });
        if kind == ObjectKind::Robot {
            if let Some(segment) = segment {
                self.spawn_debris(position, segment);
            }
        }
    }

    fn spawn_debris(&mut self, position: Vec3, segment: SegId) {
        for _ in 0..self.config.debris_count {
            let direction = Vec3::new(
                self.rng.gen_range(-1.0_f32..1.0),
                self.rng.gen_range(-1.0_f32..1.0),
                self.rng.gen_range(-1.0_f32..1.0),
            )
            .try_normalize()
            .unwrap_or(Vec3::Y);
            let speed = self.rng.gen_range(5.0_f32..15.0);
            let lifespan = self.rng.gen_range(1.0_f32..2.5);
            let data = PhysicsData::new(0.5, 0.05)
                .with_velocity(direction * speed)
                .with_flags(PhysicsFlags::BOUNCE | PhysicsFlags::GRAVITY);
            let debris = Object::new(ObjectKind::Debris, position, 0.3)
                .with_segment(segment)
                .with_lifespan(lifespan)
                .with_movement(Movement::Physics(data));
            if let Err(e) = self.spawn(debris) {
                log::debug!("Skipping debris: {}", e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::LevelBuilder;
    use crate::level::SideId;
    use crate::object::Splash;

    fn corridor() -> Level {
        let mut b = LevelBuilder::new();
        let a = b.add_box_segment(Vec3::splat(-5.0), Vec3::splat(5.0));
        let c = b.add_box_segment(Vec3::new(5.0, -5.0, -5.0), Vec3::new(15.0, 5.0, 5.0));
        b.connect(a, SideId::Right, c);
        b.build().unwrap()
    }

    fn laser() -> WeaponDefinition {
        WeaponDefinition {
            name: "laser".into(),
            speed: 64.0,
            mass: 1.0,
            drag: 0.0,
            radius: 0.1,
            lifetime: 2.0,
            damage: 10.0,
            splash: None,
            bounces: 0,
            flags: Vec::new(),
            fire_delay: 0.5,
            fire_sound: Some(audio::SoundId(1)),
            impact_sound: Some(audio::SoundId(2)),
            bounce_sound: None,
        }
    }

    fn ship(position: Vec3) -> Object {
        Object::new(ObjectKind::Player, position, 1.0)
            .with_rotation(Transform::rotation_towards(Vec3::X))
            .with_movement(Movement::Physics(PhysicsData::new(1.0, 0.1)))
    }

    #[test]
    fn stall_runs_bounded_ticks() {
        let mut sim = Simulation::new(corridor(), SimConfig::default());
        let report = sim.frame(Duration::from_secs(10), &ControlInput::idle());
        assert!(report.clamped);
        assert_eq!(report.ticks, 128);
        assert!((0.0..1.0).contains(&report.alpha));
        assert_eq!(sim.diagnostics().clamped_frames, 1);
    }

    #[test]
    fn spawn_outside_level_fails() {
        let mut sim = Simulation::new(corridor(), SimConfig::default());
        let err = sim.spawn(ship(Vec3::new(100.0, 0.0, 0.0))).unwrap_err();
        assert!(matches!(err, SpawnError::OutsideLevel { .. }));
        let id = sim.spawn(ship(Vec3::new(10.0, 0.0, 0.0))).unwrap();
        assert_eq!(sim.objects().get(id).unwrap().segment, Some(SegId(1)));
    }

    #[test]
    fn player_shot_hits_wall_and_dies() {
        let mut sim = Simulation::new(corridor(), SimConfig::default());
        let player = sim.spawn(ship(Vec3::ZERO)).unwrap();
        sim.set_player(player);
        sim.set_player_weapon(laser());
        let fire = ControlInput {
            fire_primary: true,
            ..Default::default()
        };
        sim.tick(&fire);
        assert_eq!(sim.objects().len(), 2);
        // 15 units at 1 unit per tick.
        for _ in 0..20 {
            sim.tick(&ControlInput::idle());
        }
        assert_eq!(sim.objects().len(), 1);
        let events = sim.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, SimEvent::WallHit { tag, .. } if *tag == Tag::new(SegId(1), SideId::Right))));
        let sounds = sim.sounds().drain();
        assert_eq!(sounds.len(), 2);
        assert_eq!(sounds[0].attached_to, Some(player));
    }

    #[test]
    fn shot_damages_robot() {
        let mut sim = Simulation::new(corridor(), SimConfig::default());
        let player = sim.spawn(ship(Vec3::ZERO)).unwrap();
        let robot = sim
            .spawn(Object::new(ObjectKind::Robot, Vec3::new(8.0, 0.0, 0.0), 1.0).with_health(25.0))
            .unwrap();
        sim.spawn_weapon(&laser(), player).unwrap();
        for _ in 0..10 {
            sim.tick(&ControlInput::idle());
        }
        assert_eq!(sim.objects().get(robot).unwrap().health.current, 15.0);
        assert!(sim
            .drain_events()
            .iter()
            .any(|e| matches!(e, SimEvent::ObjectHit { target, damage, .. } if *target == robot && *damage == 10.0)));
    }

    #[test]
    fn splash_kills_robot_and_throws_debris() {
        let mut sim = Simulation::new(corridor(), SimConfig::default());
        let robot = sim
            .spawn(Object::new(ObjectKind::Robot, Vec3::new(8.0, 0.0, 0.0), 1.0).with_health(5.0))
            .unwrap();
        sim.queue_explosion(GameExplosion {
            position: Vec3::new(6.0, 0.0, 0.0),
            segment: SegId(1),
            radius: 10.0,
            damage: 50.0,
            force: 0.0,
            source: None,
            sound: None,
        });
        sim.tick(&ControlInput::idle());
        assert!(sim.objects().get(robot).is_none());
        let debris = sim
            .objects()
            .iter()
            .filter(|(_, o)| o.kind == ObjectKind::Debris)
            .count();
        assert_eq!(debris, sim.config().debris_count as usize);
        let events = sim.drain_events();
        assert!(events.iter().any(|e| matches!(e, SimEvent::Destroyed { object, .. } if *object == robot)));
    }

    #[test]
    fn destroyable_wall_falls_to_weapon_splash() {
        let mut b = LevelBuilder::new();
        let a = b.add_box_segment(Vec3::splat(-5.0), Vec3::splat(5.0));
        let c = b.add_box_segment(Vec3::new(5.0, -5.0, -5.0), Vec3::new(15.0, 5.0, 5.0));
        b.connect(a, SideId::Right, c);
        let tag = Tag::new(a, SideId::Right);
        b.add_wall(tag, WallKind::Destroyable { hit_points: 15.0 });
        let mut sim = Simulation::new(b.build().unwrap(), SimConfig::default());
        let player = sim.spawn(ship(Vec3::ZERO)).unwrap();
        let mut rocket = laser();
        rocket.splash = Some(Splash {
            radius: 5.0,
            damage: 10.0,
            force: 0.0,
        });
        sim.spawn_weapon(&rocket, player).unwrap();
        for _ in 0..10 {
            sim.tick(&ControlInput::idle());
        }
        assert!(sim
            .drain_events()
            .iter()
            .any(|e| matches!(e, SimEvent::WallDestroyed { tag: t } if *t == tag)));
        assert!(matches!(sim.level().passage(tag), crate::level::Passage::Open(_)));
    }

    #[test]
    fn interpolation_blends_last_and_current() {
        let mut sim = Simulation::new(corridor(), SimConfig::default());
        let id = sim
            .spawn(
                Object::new(ObjectKind::Debris, Vec3::ZERO, 0.1).with_movement(Movement::Physics(
                    PhysicsData::new(1.0, 0.0).with_velocity(Vec3::X * 64.0),
                )),
            )
            .unwrap();
        sim.tick(&ControlInput::idle());
        let mid = sim.interpolated_transform(id, 0.5).unwrap();
        assert!((mid.position.x - 0.5).abs() < 1e-5);
        sim.objects_mut().remove(id);
        assert!(sim.interpolated_transform(id, 0.5).is_none());
    }

    #[test]
    fn doors_gate_sight_and_walls_fall_between_frames() {
        let mut b = LevelBuilder::new();
        let a = b.add_box_segment(Vec3::splat(-5.0), Vec3::splat(5.0));
        let c = b.add_box_segment(Vec3::new(5.0, -5.0, -5.0), Vec3::new(15.0, 5.0, 5.0));
        let d = b.add_box_segment(Vec3::new(-15.0, -5.0, -5.0), Vec3::new(-5.0, 5.0, 5.0));
        b.connect(a, SideId::Right, c);
        b.connect(a, SideId::Left, d);
        let door = Tag::new(a, SideId::Right);
        let rubble = Tag::new(a, SideId::Left);
        b.add_wall(door, WallKind::Door { open: false });
        b.add_wall(rubble, WallKind::Destroyable { hit_points: 5.0 });
        let mut sim = Simulation::new(b.build().unwrap(), SimConfig::default());

        let eye = sim.spawn(ship(Vec3::ZERO)).unwrap();
        let east = sim.spawn(Object::new(ObjectKind::Robot, Vec3::new(10.0, 0.0, 0.0), 1.0)).unwrap();
        let west = sim.spawn(Object::new(ObjectKind::Robot, Vec3::new(-10.0, 0.0, 0.0), 1.0)).unwrap();
        assert!(!sim.can_see(eye, east));
        assert!(sim.set_door(door, true));
        assert!(sim.can_see(eye, east));
        assert!(!sim.set_door(rubble, true));

        assert!(!sim.can_see(eye, west));
        assert!(!sim.damage_wall(rubble, 2.0));
        assert!(sim.damage_wall(rubble, 3.0));
        assert!(sim.can_see(eye, west));
        assert_eq!(sim.drain_events(), vec![SimEvent::WallDestroyed { tag: rubble }]);
    }

    #[test]
    fn applied_force_moves_object_next_tick() {
        let mut sim = Simulation::new(corridor(), SimConfig::default());
        let id = sim.spawn(ship(Vec3::ZERO)).unwrap();
        let still = sim
            .spawn(Object::new(ObjectKind::Reactor, Vec3::new(8.0, 0.0, 0.0), 2.0))
            .unwrap();
        assert!(sim.apply_force(id, Vec3::Y * 64.0));
        assert!(!sim.apply_force(still, Vec3::Y));
        sim.tick(&ControlInput::idle());
        let object = sim.objects().get(id).unwrap();
        assert!(object.velocity().y > 0.0);
        assert!(object.position().y > 0.0);
        assert_eq!(object.physics().unwrap().pending_force, Vec3::ZERO);
    }

    #[test]
    fn load_level_drops_objects() {
        let mut sim = Simulation::new(corridor(), SimConfig::default());
        let player = sim.spawn(ship(Vec3::ZERO)).unwrap();
        sim.set_player(player);
        sim.load_level(corridor());
        assert!(sim.objects().is_empty());
        assert_eq!(sim.player(), None);
    }
}
