//! Collision groups and filtering between objects.

use crate::object::{Object, ObjectKind, ObjectPool};
use engine_core::ObjectId;

/// Collision groups for different object categories.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroup {
    /// Player ship
    Player = 1 << 0,
    /// Hostile robots
    Robot = 1 << 1,
    /// Shots fired by the player
    PlayerWeapon = 1 << 2,
    /// Shots fired by robots (or orphaned shots)
    RobotWeapon = 1 << 3,
    /// Debris and physics props
    Debris = 1 << 4,
    /// Pickups
    Powerup = 1 << 5,
    /// Reactor core
    Reactor = 1 << 6,
}

/// Membership/filter bitmask pair. Two objects interact only if each one's
/// membership intersects the other's filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionGroups {
    pub memberships: u32,
    pub filter: u32,
}

impl CollisionGroups {
    /// Collides with every group. Used for queries without a source object.
    pub const ALL: Self = Self {
        memberships: u32::MAX,
        filter: u32::MAX,
    };

    /// Never collides with anything.
    pub const NONE: Self = Self {
        memberships: 0,
        filter: 0,
    };

    fn new(membership: CollisionGroup, filter: &[CollisionGroup]) -> Self {
        Self {
            memberships: membership as u32,
            filter: filter.iter().fold(0, |acc, g| acc | *g as u32),
        }
    }

    pub fn interacts_with(self, other: Self) -> bool {
        self.memberships & other.filter != 0 && other.memberships & self.filter != 0
    }

    /// Groups for an object of `kind`. Weapons take their side from the
    /// kind of the object that fired them.
    pub fn for_kind(kind: ObjectKind, parent_kind: Option<ObjectKind>) -> Self {
        use CollisionGroup as G;
        match kind {
            ObjectKind::Player => Self::new(
                G::Player,
                &[G::Robot, G::RobotWeapon, G::Powerup, G::Reactor, G::Debris],
            ),
            ObjectKind::Robot => Self::new(
                G::Robot,
                &[G::Player, G::Robot, G::PlayerWeapon, G::Reactor],
            ),
            ObjectKind::Reactor => Self::new(G::Reactor, &[G::Player, G::Robot, G::PlayerWeapon]),
            ObjectKind::Powerup => Self::new(G::Powerup, &[G::Player]),
            ObjectKind::Debris => Self::new(G::Debris, &[G::Player]),
            ObjectKind::Weapon => match parent_kind {
                Some(ObjectKind::Player) => {
                    Self::new(G::PlayerWeapon, &[G::Robot, G::Reactor])
                }
                _ => Self::new(G::RobotWeapon, &[G::Player]),
            },
            // Cameras and fireballs are never hit by anything.
            ObjectKind::Camera | ObjectKind::Fireball => Self::NONE,
        }
    }

    /// Groups of a live object, resolving its parent through the pool.
    pub fn of(object: &Object, objects: &ObjectPool) -> Self {
        let parent_kind = object
            .parent
            .and_then(|p| objects.get(p).map(|parent| parent.kind));
        Self::for_kind(object.kind, parent_kind)
    }
}

/// True if `a` and `b` are related by firing (a shot never hits its shooter).
///
/// Shots from the same shooter are related to each other as well.
pub fn related(
    a_id: ObjectId,
    a_parent: Option<ObjectId>,
    b_id: ObjectId,
    b_parent: Option<ObjectId>,
) -> bool {
    a_parent == Some(b_id) || b_parent == Some(a_id) || (a_parent.is_some() && a_parent == b_parent)
}
