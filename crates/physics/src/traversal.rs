//! Level traversal: breadth-first portal walks that feed faces and objects
//! to the geometry query layer.
//!
//! A query starts in one segment and only expands through sides its ray or
//! swept sphere actually crosses, so cost scales with the neighborhood the
//! query can reach rather than with the size of the level.

use crate::collision::{related, CollisionGroups};
use crate::face::Face;
use crate::hit::{HitInfo, HitTarget, LevelHit};
use crate::intersect::{point_segment_distance, ray_sphere, EPSILON};
use crate::level::{Level, Passage, SegId, SideId, Tag, CONTAINMENT_EPSILON};
use crate::object::{Object, ObjectPool};
use engine_core::{ObjectId, Vec2, Vec3};
use std::collections::{HashMap, VecDeque};

/// A ray with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Returns None for a zero or non-finite direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    /// Ray from `from` towards `to`, plus the distance between them.
    pub fn between(from: Vec3, to: Vec3) -> Option<(Self, f32)> {
        let delta = to - from;
        let distance = delta.length();
        if distance < EPSILON {
            return None;
        }
        Some((
            Self {
                origin: from,
                direction: delta / distance,
            },
            distance,
        ))
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// The object issuing a query. It is never hit by its own query, and
/// neither are objects it fired or that fired it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuerySource {
    pub id: ObjectId,
    pub parent: Option<ObjectId>,
    pub groups: CollisionGroups,
}

impl QuerySource {
    pub fn of(id: ObjectId, object: &Object, objects: &ObjectPool) -> Self {
        Self {
            id,
            parent: object.parent,
            groups: CollisionGroups::of(object, objects),
        }
    }
}

/// Parameters of a level query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayQuery {
    /// Segment containing the query origin.
    pub start: SegId,
    pub max_distance: f32,
    /// Rays pass through see-through overlays (grates).
    pub pass_transparent: bool,
    /// Rays pass through the transparent pixels of see-through overlays and
    /// stop on opaque ones.
    pub hit_test_textures: bool,
    /// Test objects in the visited segments as well as geometry.
    pub hit_objects: bool,
    pub source: Option<QuerySource>,
}

impl RayQuery {
    pub fn new(start: SegId, max_distance: f32) -> Self {
        Self {
            start,
            max_distance,
            pass_transparent: false,
            hit_test_textures: false,
            hit_objects: false,
            source: None,
        }
    }

    pub fn pass_transparent(mut self, pass: bool) -> Self {
        self.pass_transparent = pass;
        self
    }

    pub fn hit_test_textures(mut self, test: bool) -> Self {
        self.hit_test_textures = test;
        self
    }

    pub fn with_objects(mut self, source: Option<QuerySource>) -> Self {
        self.hit_objects = true;
        self.source = source;
        self
    }
}

/// Work counters for one or more queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    pub queries: u32,
    pub segments_visited: u32,
    pub faces_tested: u32,
    pub objects_tested: u32,
}

impl TraversalStats {
    pub fn add(&mut self, other: &TraversalStats) {
        self.queries += other.queries;
        self.segments_visited += other.segments_visited;
        self.faces_tested += other.faces_tested;
        self.objects_tested += other.objects_tested;
    }
}

/// Cast a ray through the level, folding the nearest hit into `hit`.
///
/// Returns true if `hit` holds a hit afterwards.
pub fn intersect_level(
    level: &Level,
    objects: Option<&ObjectPool>,
    ray: &Ray,
    query: &RayQuery,
    hit: &mut LevelHit,
    stats: &mut TraversalStats,
) -> bool {
    trace(level, objects, ray, 0.0, query, hit, stats);
    hit.is_hit()
}

/// Sweep a sphere of `radius` through the level. Spheres treat see-through
/// overlays as solid.
pub fn sweep_level(
    level: &Level,
    objects: Option<&ObjectPool>,
    ray: &Ray,
    radius: f32,
    query: &RayQuery,
    hit: &mut LevelHit,
    stats: &mut TraversalStats,
) -> bool {
    trace(level, objects, ray, radius.max(0.0), query, hit, stats);
    hit.is_hit()
}

/// Line of sight between two points, ignoring objects. Grates do not block.
pub fn visible(level: &Level, from: Vec3, from_seg: SegId, to: Vec3) -> bool {
    let Some((ray, distance)) = Ray::between(from, to) else {
        return true;
    };
    let query = RayQuery::new(from_seg, distance).pass_transparent(true);
    let mut hit = LevelHit::default();
    !intersect_level(level, None, &ray, &query, &mut hit, &mut TraversalStats::default())
}

fn cast(face: &Face<'_>, ray: &Ray, max_distance: f32, radius: f32) -> Option<HitInfo> {
    if radius > 0.0 {
        face.sweep_sphere(ray.origin, ray.direction, max_distance, radius)
    } else {
        face.intersect_ray(ray.origin, ray.direction, max_distance, None)
    }
}

/// Distance at which the query enters the segment behind a portal face.
fn crossing(face: &Face<'_>, ray: &Ray, max_distance: f32, radius: f32) -> Option<f32> {
    // Origin sitting on the portal (or slightly past it after a late resync).
    if face.overlaps_sphere(ray.origin, radius + CONTAINMENT_EPSILON) {
        return Some(0.0);
    }
    cast(face, ray, max_distance, radius).map(|info| info.distance)
}

fn see_through(level: &Level, face: &Face<'_>, query: &RayQuery, uv: Vec2) -> bool {
    if query.pass_transparent {
        return true;
    }
    if !query.hit_test_textures {
        return false;
    }
    let Some(overlay) = face.side.tmap2.and_then(|t| level.texture(t)) else {
        return false;
    };
    match &overlay.mask {
        Some(mask) => !mask.is_opaque(uv),
        None => overlay.transparent,
    }
}

fn trace(
    level: &Level,
    objects: Option<&ObjectPool>,
    ray: &Ray,
    radius: f32,
    query: &RayQuery,
    hit: &mut LevelHit,
    stats: &mut TraversalStats,
) {
    if level.segment(query.start).is_none() || !(query.max_distance >= 0.0) {
        return;
    }
    stats.queries += 1;
    let max_distance = query.max_distance;
    let end = ray.at(max_distance);

    // Earliest known entry distance per reached segment.
    let mut entries = HashMap::from([(query.start, 0.0_f32)]);
    let mut queue = VecDeque::from([(query.start, 0.0_f32)]);
    while let Some((seg, entry)) = queue.pop_front() {
        // Reached again through a nearer portal after this was queued.
        if entries.get(&seg).is_some_and(|&best| entry > best) {
            continue;
        }
        // Anything behind this portal is farther than what we already have.
        if entry > max_distance || entry >= hit.distance {
            continue;
        }
        stats.segments_visited += 1;

        for side in SideId::ALL {
            let tag = Tag::new(seg, side);
            let Some(face) = level.face(tag) else {
                continue;
            };
            let reach = face.bounding_radius() + radius;
            if point_segment_distance(face.center(), ray.origin, end) > reach {
                continue;
            }
            stats.faces_tested += 1;

            match level.passage(tag) {
                Passage::Solid => {
                    if let Some(info) = cast(&face, ray, max_distance, radius) {
                        hit.update(&info, HitTarget::Face(tag));
                    }
                }
                Passage::Open(next) => {
                    if let Some(distance) = crossing(&face, ray, max_distance, radius) {
                        enter(&mut entries, &mut queue, next, distance);
                    }
                }
                Passage::Transparent(next) => {
                    if radius > 0.0 {
                        if let Some(info) = cast(&face, ray, max_distance, radius) {
                            hit.update(&info, HitTarget::Face(tag));
                        }
                        continue;
                    }
                    let Some(info) = face.intersect_ray(ray.origin, ray.direction, max_distance, None)
                    else {
                        continue;
                    };
                    if see_through(level, &face, query, info.uv) {
                        enter(&mut entries, &mut queue, next, info.distance);
                    } else {
                        hit.update(&info, HitTarget::Face(tag));
                    }
                }
            }
        }
    }

    // Objects after geometry: on an exact tie the face stays.
    if query.hit_objects {
        if let Some(objects) = objects {
            trace_objects(level, objects, &entries, ray, radius, query, hit, stats);
        }
    }
}

/// Queue `seg` unless it is already reached at or before `distance`.
fn enter(
    entries: &mut HashMap<SegId, f32>,
    queue: &mut VecDeque<(SegId, f32)>,
    seg: SegId,
    distance: f32,
) {
    if entries.get(&seg).is_some_and(|&known| known <= distance) {
        return;
    }
    entries.insert(seg, distance);
    queue.push_back((seg, distance));
}

/// True if an object centered in `seg` pokes through one of its open sides
/// into a reached segment.
fn reaches_into(
    level: &Level,
    seg: SegId,
    center: Vec3,
    radius: f32,
    reached: &HashMap<SegId, f32>,
) -> bool {
    let Some(segment) = level.segment(seg) else {
        return false;
    };
    segment.connections().any(|(side, next)| {
        let tag = Tag::new(seg, side);
        reached.contains_key(&next)
            && level.passage(tag) != Passage::Solid
            && level.face(tag).is_some_and(|face| face.distance_to(center) < radius)
    })
}

#[allow(clippy::too_many_arguments)]
fn trace_objects(
    level: &Level,
    objects: &ObjectPool,
    reached: &HashMap<SegId, f32>,
    ray: &Ray,
    radius: f32,
    query: &RayQuery,
    hit: &mut LevelHit,
    stats: &mut TraversalStats,
) {
    let groups = query.source.map_or(CollisionGroups::ALL, |s| s.groups);
    for (id, object) in objects.iter() {
        if object.is_dead() {
            continue;
        }
        let Some(seg) = object.segment else {
            continue;
        };
        let center = object.position();
        if !reached.contains_key(&seg) && !reaches_into(level, seg, center, object.radius, reached) {
            continue;
        }
        if let Some(source) = query.source {
            if source.id == id || related(source.id, source.parent, id, object.parent) {
                continue;
            }
        }
        if !groups.interacts_with(CollisionGroups::of(&object, objects)) {
            continue;
        }
        stats.objects_tested += 1;

        let Some(distance) = ray_sphere(ray.origin, ray.direction, center, object.radius + radius)
        else {
            continue;
        };
        if distance > query.max_distance {
            continue;
        }
        // Already overlapping and moving apart: let it separate.
        if distance == 0.0 && (center - ray.origin).dot(ray.direction) <= 0.0 {
            continue;
        }
        let normal = (ray.at(distance) - center)
            .try_normalize()
            .unwrap_or(-ray.direction);
        let info = HitInfo {
            distance,
            point: center + normal * object.radius,
            normal,
            triangle: None,
            uv: Vec2::ZERO,
            edge_distance: 0.0,
        };
        hit.update(&info, HitTarget::Object(id));
    }
}
