//! Hit records and the nearest-hit merge.

use crate::level::Tag;
use engine_core::{ObjectId, Vec2, Vec3};

/// Raw result of testing one candidate (a face or an object).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitInfo {
    /// Distance travelled along the query direction.
    pub distance: f32,
    /// Contact point on the surface.
    pub point: Vec3,
    /// Surface normal at the contact, facing the query.
    pub normal: Vec3,
    /// Which triangle of the quad was hit; None for objects.
    pub triangle: Option<u8>,
    /// Interpolated texture coordinate (faces only).
    pub uv: Vec2,
    /// Distance from the contact to the nearest quad edge (faces only).
    pub edge_distance: f32,
}

/// What a hit landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Face(Tag),
    Object(ObjectId),
}

/// Nearest hit of a level query.
///
/// The default value has `distance == f32::MAX` and means "no hit"; the
/// other fields are meaningless in that state. Exactly one of `tag` and
/// `object` is set once something was hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelHit {
    pub distance: f32,
    pub point: Vec3,
    pub normal: Vec3,
    pub tangent: Vec3,
    pub tag: Option<Tag>,
    pub object: Option<ObjectId>,
    pub triangle: Option<u8>,
    /// Closing speed along the normal at impact, filled in by the integrator.
    pub speed: f32,
    pub edge_distance: f32,
    /// Set by the integrator when the response was a bounce.
    pub bounced: bool,
}

impl Default for LevelHit {
    fn default() -> Self {
        Self {
            distance: f32::MAX,
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
            tangent: Vec3::ZERO,
            tag: None,
            object: None,
            triangle: None,
            speed: 0.0,
            edge_distance: 0.0,
            bounced: false,
        }
    }
}

impl LevelHit {
    pub fn is_hit(&self) -> bool {
        self.distance < f32::MAX
    }

    /// Replace the current hit if `info` is strictly closer. Returns true if it was.
    ///
    /// Equal distances keep the earlier hit, so the result depends only on
    /// discovery order for exact ties.
    pub fn update(&mut self, info: &HitInfo, target: HitTarget) -> bool {
        if info.distance.is_nan() || info.distance >= self.distance {
            return false;
        }
        self.distance = info.distance;
        self.point = info.point;
        self.normal = info.normal;
        self.tangent = tangent_for(info.normal);
        self.triangle = info.triangle;
        self.edge_distance = info.edge_distance;
        self.speed = 0.0;
        self.bounced = false;
        match target {
            HitTarget::Face(tag) => {
                self.tag = Some(tag);
                self.object = None;
            }
            HitTarget::Object(id) => {
                self.tag = None;
                self.object = Some(id);
            }
        }
        true
    }

    pub fn target(&self) -> Option<HitTarget> {
        if !self.is_hit() {
            return None;
        }
        match (self.tag, self.object) {
            (Some(tag), _) => Some(HitTarget::Face(tag)),
            (None, Some(id)) => Some(HitTarget::Object(id)),
            (None, None) => None,
        }
    }
}

impl From<&LevelHit> for bool {
    fn from(hit: &LevelHit) -> bool {
        hit.is_hit()
    }
}

/// Unit tangent perpendicular to `normal`.
///
/// Uses world up as the reference axis and falls back to world right when
/// the normal is (anti)parallel to up. Never returns NaN; a zero or
/// non-finite normal yields `Vec3::X`.
pub fn tangent_for(normal: Vec3) -> Vec3 {
    const MIN_LENGTH: f32 = 1e-4;
    let tangent = normal.cross(Vec3::Y);
    if tangent.length() > MIN_LENGTH && tangent.is_finite() {
        return tangent.normalize();
    }
    let tangent = normal.cross(Vec3::X);
    if tangent.length() > MIN_LENGTH && tangent.is_finite() {
        return tangent.normalize();
    }
    Vec3::X
}
