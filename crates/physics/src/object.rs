//! Simulated objects and the arena that owns them.
//!
//! Objects live in a `hecs::World`, one `Object` component per entity. The
//! world's generational entity ids make [`ObjectId`]s stable: a handle to a
//! dead object never resolves to whatever later reuses its slot.

use crate::level::{SegId, Tag};
use audio::SoundId;
use engine_core::{Health, Lifetime, ObjectId, Quat, Transform, Vec3};
use hecs::World;
use serde::{Deserialize, Serialize};
use std::ops::BitOr;
use thiserror::Error;

/// Object category. Decides collision filtering and damage rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Player,
    Robot,
    Weapon,
    Debris,
    Powerup,
    Camera,
    Reactor,
    Fireball,
}

/// Collision response flags for physics-driven objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PhysicsFlags(u8);

impl PhysicsFlags {
    pub const NONE: Self = Self(0);
    /// Reflect off walls instead of sliding.
    pub const BOUNCE: Self = Self(1 << 0);
    /// Stop dead and stay attached to the first wall hit.
    pub const STICK: Self = Self(1 << 1);
    /// Weapons keep flying after hitting an object.
    pub const PIERCING: Self = Self(1 << 2);
    /// Affected by the level's gravity.
    pub const GRAVITY: Self = Self(1 << 3);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for PhysicsFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// State of a physics-driven object.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsData {
    pub velocity: Vec3,
    /// World-space angular velocity (axis * radians per second).
    pub angular_velocity: Vec3,
    /// Continuous force in world space.
    pub thrust: Vec3,
    /// Continuous torque in world space.
    pub angular_thrust: Vec3,
    /// Forces applied since the last tick (explosions, impacts).
    pub pending_force: Vec3,
    pub pending_torque: Vec3,
    pub mass: f32,
    /// Fraction of velocity lost per 1/64 s.
    pub drag: f32,
    pub angular_drag: f32,
    pub flags: PhysicsFlags,
    /// Remaining bounces; None means unlimited.
    pub bounces_left: Option<u32>,
    /// Face this object is stuck to (STICK objects).
    pub stuck_to: Option<Tag>,
}

impl Default for PhysicsData {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            thrust: Vec3::ZERO,
            angular_thrust: Vec3::ZERO,
            pending_force: Vec3::ZERO,
            pending_torque: Vec3::ZERO,
            mass: 1.0,
            drag: 0.0,
            angular_drag: 0.0,
            flags: PhysicsFlags::NONE,
            bounces_left: None,
            stuck_to: None,
        }
    }
}

impl PhysicsData {
    pub fn new(mass: f32, drag: f32) -> Self {
        Self {
            mass,
            drag,
            ..Default::default()
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_flags(mut self, flags: PhysicsFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_angular_drag(mut self, angular_drag: f32) -> Self {
        self.angular_drag = angular_drag;
        self
    }

    pub fn with_bounces(mut self, bounces: u32) -> Self {
        self.bounces_left = Some(bounces);
        self
    }

    /// Bounce flag set and bounces remaining.
    pub fn can_bounce(&self) -> bool {
        self.flags.contains(PhysicsFlags::BOUNCE) && self.bounces_left.map_or(true, |n| n > 0)
    }
}

/// Waypoint path at constant speed.
#[derive(Debug, Clone, PartialEq)]
pub struct PathFollow {
    pub waypoints: Vec<Vec3>,
    pub speed: f32,
    pub next: usize,
    pub looping: bool,
}

impl PathFollow {
    pub fn new(waypoints: Vec<Vec3>, speed: f32, looping: bool) -> Self {
        Self {
            waypoints,
            speed,
            next: 0,
            looping,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.waypoints.len()
    }
}

/// How an object moves each tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Movement {
    /// Static (reactors, powerups, parked cameras).
    #[default]
    None,
    /// Integrated with collision response.
    Physics(PhysicsData),
    /// Rotates in place.
    Spinning { angular_velocity: Vec3 },
    /// Follows waypoints without collision.
    Path(PathFollow),
}

/// Area damage a weapon deals on impact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Splash {
    pub radius: f32,
    pub damage: f32,
    pub force: f32,
}

/// Payload carried by weapon objects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponInfo {
    pub damage: f32,
    pub splash: Option<Splash>,
    pub impact_sound: Option<SoundId>,
    pub bounce_sound: Option<SoundId>,
}

/// A dynamic entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub kind: ObjectKind,
    pub transform: Transform,
    /// Transform at the start of the current tick, for render interpolation.
    pub last_transform: Transform,
    pub radius: f32,
    /// Segment containing (or last containing) the object; None once it left the level.
    pub segment: Option<SegId>,
    pub movement: Movement,
    pub health: Health,
    pub lifespan: Lifetime,
    /// Object that created this one (the shooter of a weapon).
    pub parent: Option<ObjectId>,
    pub weapon: Option<WeaponInfo>,
}

impl Object {
    pub fn new(kind: ObjectKind, position: Vec3, radius: f32) -> Self {
        let transform = Transform::from_position(position);
        let health = match kind {
            ObjectKind::Player | ObjectKind::Robot | ObjectKind::Reactor => Health::default(),
            _ => Health::invulnerable(),
        };
        Self {
            kind,
            transform,
            last_transform: transform,
            radius,
            segment: None,
            movement: Movement::None,
            health,
            lifespan: Lifetime::permanent(),
            parent: None,
            weapon: None,
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.transform.rotation = rotation;
        self.last_transform.rotation = rotation;
        self
    }

    pub fn with_movement(mut self, movement: Movement) -> Self {
        self.movement = movement;
        self
    }

    pub fn with_health(mut self, hit_points: f32) -> Self {
        self.health = Health::new(hit_points);
        self
    }

    pub fn with_lifespan(mut self, seconds: f32) -> Self {
        self.lifespan = Lifetime::new(seconds);
        self
    }

    pub fn with_segment(mut self, segment: SegId) -> Self {
        self.segment = Some(segment);
        self
    }

    pub fn with_parent(mut self, parent: ObjectId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_weapon(mut self, weapon: WeaponInfo) -> Self {
        self.weapon = Some(weapon);
        self
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn velocity(&self) -> Vec3 {
        match &self.movement {
            Movement::Physics(p) => p.velocity,
            _ => Vec3::ZERO,
        }
    }

    pub fn physics(&self) -> Option<&PhysicsData> {
        match &self.movement {
            Movement::Physics(p) => Some(p),
            _ => None,
        }
    }

    pub fn physics_mut(&mut self) -> Option<&mut PhysicsData> {
        match &mut self.movement {
            Movement::Physics(p) => Some(p),
            _ => None,
        }
    }

    /// Dead objects are skipped by every system and removed at the end of the tick.
    pub fn is_dead(&self) -> bool {
        self.lifespan.is_expired()
    }

    pub fn kill(&mut self) {
        self.lifespan.expire();
    }

    /// Fell out of the level; frozen until the owner cleans it up.
    pub fn is_outside_level(&self) -> bool {
        self.segment.is_none()
    }

    /// Render transform between the previous and current tick.
    pub fn interpolated(&self, alpha: f32) -> Transform {
        self.last_transform.interpolate(&self.transform, alpha)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpawnError {
    #[error("object pool is full ({capacity} objects)")]
    PoolFull { capacity: usize },
    #[error("spawn position {position:?} is not inside any segment")]
    OutsideLevel { position: Vec3 },
    #[error("parent object {0} no longer exists")]
    MissingParent(ObjectId),
}

/// Fixed-capacity object arena.
pub struct ObjectPool {
    world: World,
    capacity: usize,
}

impl ObjectPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            world: World::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.world.is_empty()
    }

    /// Insert an object. Freed slots are reused with a new generation.
    pub fn spawn(&mut self, object: Object) -> Result<ObjectId, SpawnError> {
        if self.len() >= self.capacity {
            return Err(SpawnError::PoolFull {
                capacity: self.capacity,
            });
        }
        Ok(ObjectId::from_entity(self.world.spawn((object,))))
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.world.contains(id.entity())
    }

    /// Borrow an object; None if the id is stale.
    pub fn get(&self, id: ObjectId) -> Option<hecs::Ref<'_, Object>> {
        self.world.get::<&Object>(id.entity()).ok()
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.world.query_one_mut::<&mut Object>(id.entity()).ok()
    }

    /// Copy of an object's current state.
    pub fn snapshot(&self, id: ObjectId) -> Option<Object> {
        self.get(id).map(|o| (*o).clone())
    }

    pub fn position(&self, id: ObjectId) -> Option<Vec3> {
        self.get(id).map(|o| o.position())
    }

    /// Remove an object. Returns false if it was already gone.
    pub fn remove(&mut self, id: ObjectId) -> bool {
        self.world.despawn(id.entity()).is_ok()
    }

    /// Ids of every live slot, in storage order.
    pub fn ids(&self) -> Vec<ObjectId> {
        self.world
            .iter()
            .map(|e| ObjectId::from_entity(e.entity()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, hecs::Ref<'_, Object>)> + '_ {
        self.world.iter().filter_map(|e| {
            let id = ObjectId::from_entity(e.entity());
            e.get::<&Object>().map(|o| (id, o))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ObjectId, &mut Object)> + '_ {
        self.world
            .query_mut::<&mut Object>()
            .into_iter()
            .map(|(e, o)| (ObjectId::from_entity(e), o))
    }

    /// Remove every dead object. Returns the removed ids.
    pub fn reap(&mut self) -> Vec<ObjectId> {
        let dead: Vec<ObjectId> = self
            .iter()
            .filter(|(_, o)| o.is_dead())
            .map(|(id, _)| id)
            .collect();
        for id in &dead {
            self.remove(*id);
        }
        dead
    }

    pub fn clear(&mut self) {
        self.world.clear();
    }
}
