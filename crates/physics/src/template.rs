//! Object templates and weapon definitions, as provided by the data catalog.

use crate::object::{
    Movement, Object, ObjectKind, PhysicsData, PhysicsFlags, Splash, WeaponInfo,
};
use audio::SoundId;
use engine_core::{ObjectId, Quat, Transform, Vec3};
use serde::{Deserialize, Serialize};

/// Serialized name of a single physics flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhysicsFlag {
    Bounce,
    Stick,
    Piercing,
    Gravity,
}

impl From<PhysicsFlag> for PhysicsFlags {
    fn from(flag: PhysicsFlag) -> Self {
        match flag {
            PhysicsFlag::Bounce => PhysicsFlags::BOUNCE,
            PhysicsFlag::Stick => PhysicsFlags::STICK,
            PhysicsFlag::Piercing => PhysicsFlags::PIERCING,
            PhysicsFlag::Gravity => PhysicsFlags::GRAVITY,
        }
    }
}

fn collect_flags(flags: &[PhysicsFlag]) -> PhysicsFlags {
    flags
        .iter()
        .fold(PhysicsFlags::NONE, |acc, &f| acc | PhysicsFlags::from(f))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum MovementKind {
    #[default]
    Static,
    Physics,
    Spinning(Vec3),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectTemplate {
    pub name: String,
    pub kind: ObjectKind,
    #[serde(default = "default_radius")]
    pub radius: f32,
    /// None keeps the kind's default.
    #[serde(default)]
    pub hit_points: Option<f32>,
    #[serde(default = "default_mass")]
    pub mass: f32,
    #[serde(default)]
    pub drag: f32,
    #[serde(default)]
    pub angular_drag: f32,
    #[serde(default)]
    pub movement: MovementKind,
    #[serde(default)]
    pub flags: Vec<PhysicsFlag>,
    /// Seconds to live; None is permanent.
    #[serde(default)]
    pub lifespan: Option<f32>,
}

fn default_radius() -> f32 {
    1.0
}
fn default_mass() -> f32 {
    1.0
}

impl ObjectTemplate {
    pub fn instantiate(&self, position: Vec3, rotation: Quat) -> Object {
        let movement = match self.movement {
            MovementKind::Static => Movement::None,
            MovementKind::Physics => Movement::Physics(
                PhysicsData::new(self.mass, self.drag)
                    .with_angular_drag(self.angular_drag)
                    .with_flags(collect_flags(&self.flags)),
            ),
            MovementKind::Spinning(angular_velocity) => Movement::Spinning { angular_velocity },
        };
        let mut object = Object::new(self.kind, position, self.radius)
            .with_rotation(rotation)
            .with_movement(movement);
        if let Some(hp) = self.hit_points {
            object = object.with_health(hp);
        }
        if let Some(seconds) = self.lifespan {
            object = object.with_lifespan(seconds);
        }
        object
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponDefinition {
    pub name: String,
    /// Muzzle speed in units per second.
    pub speed: f32,
    #[serde(default = "default_mass")]
    pub mass: f32,
    #[serde(default)]
    pub drag: f32,
    #[serde(default = "default_weapon_radius")]
    pub radius: f32,
    /// Seconds before the shot fizzles.
    pub lifetime: f32,
    pub damage: f32,
    #[serde(default)]
    pub splash: Option<Splash>,
    /// Wall bounces before the shot detonates; zero never bounces.
    #[serde(default)]
    pub bounces: u32,
    #[serde(default)]
    pub flags: Vec<PhysicsFlag>,
    /// Seconds between shots.
    #[serde(default = "default_fire_delay")]
    pub fire_delay: f32,
    #[serde(default)]
    pub fire_sound: Option<SoundId>,
    #[serde(default)]
    pub impact_sound: Option<SoundId>,
    #[serde(default)]
    pub bounce_sound: Option<SoundId>,
}

fn default_weapon_radius() -> f32 {
    0.25
}
fn default_fire_delay() -> f32 {
    0.25
}

impl WeaponDefinition {
    /// A shot leaving `position` along `direction`. Returns None for a zero direction.
    pub fn instantiate(&self, position: Vec3, direction: Vec3, parent: Option<ObjectId>) -> Option<Object> {
        let direction = direction.try_normalize()?;
        let mut flags = collect_flags(&self.flags);
        let mut data = PhysicsData::new(self.mass, self.drag).with_velocity(direction * self.speed);
        if self.bounces > 0 {
            flags.insert(PhysicsFlags::BOUNCE);
            data = data.with_bounces(self.bounces);
        }
        let mut object = Object::new(ObjectKind::Weapon, position, self.radius)
            .with_rotation(Transform::rotation_towards(direction))
            .with_movement(Movement::Physics(data.with_flags(flags)))
            .with_lifespan(self.lifetime)
            .with_weapon(WeaponInfo {
                damage: self.damage,
                splash: self.splash,
                impact_sound: self.impact_sound,
                bounce_sound: self.bounce_sound,
            });
        object.parent = parent;
        Some(object)
    }
}

/// Every template the simulation can spawn by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub objects: Vec<ObjectTemplate>,
    #[serde(default)]
    pub weapons: Vec<WeaponDefinition>,
}

impl Catalog {
    pub fn object(&self, name: &str) -> Option<&ObjectTemplate> {
        self.objects.iter().find(|t| t.name == name)
    }

    pub fn weapon(&self, name: &str) -> Option<&WeaponDefinition> {
        self.weapons.iter().find(|w| w.name == name)
    }
}
