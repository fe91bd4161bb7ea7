//! Gameplay events produced by a tick, drained by the owner after each frame.

use crate::level::{SegId, Tag};
use crate::object::ObjectKind;
use engine_core::{ObjectId, Vec3};

#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// An object collided with level geometry.
    WallHit {
        object: ObjectId,
        tag: Tag,
        point: Vec3,
        normal: Vec3,
        /// Closing speed along the normal.
        speed: f32,
        bounced: bool,
    },
    /// An object (usually a weapon) struck another object.
    ObjectHit {
        object: ObjectId,
        target: ObjectId,
        point: Vec3,
        damage: f32,
    },
    Explosion {
        position: Vec3,
        segment: SegId,
        radius: f32,
        affected: usize,
    },
    WallDestroyed { tag: Tag },
    /// Hit points ran out.
    Destroyed {
        object: ObjectId,
        kind: ObjectKind,
        position: Vec3,
    },
    /// The object is outside every segment and has been frozen.
    LeftLevel { object: ObjectId, position: Vec3 },
}
