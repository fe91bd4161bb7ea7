//! Explosion propagation: area damage and knockback through open geometry.
//!
//! Propagation is split in two. [`propagate`] only reads the level and the
//! object pool and returns a report; [`apply`] then mutates objects. Wall
//! damage in the report is applied by the simulation between ticks.

use crate::integrator::apply_force;
use crate::level::{Level, SegId, SideId, Tag, WallKind};
use crate::object::ObjectPool;
use crate::traversal::{visible, TraversalStats};
use audio::SoundId;
use engine_core::{ObjectId, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Fraction of damage and force reaching an occluded target in [`Occlusion::Muffle`] mode.
pub const MUFFLE_FACTOR: f32 = 0.25;

/// Effect of solid geometry between an explosion and its target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Occlusion {
    /// Occluded targets are unaffected.
    #[default]
    Block,
    /// Occluded targets receive [`MUFFLE_FACTOR`] of the effect.
    Muffle,
}

/// A point blast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameExplosion {
    pub position: Vec3,
    /// Segment containing `position`; bounds the traversal.
    pub segment: SegId,
    pub radius: f32,
    pub damage: f32,
    pub force: f32,
    /// Object that caused the blast (never affected by it).
    pub source: Option<ObjectId>,
    pub sound: Option<SoundId>,
}

/// Linear falloff `1 - d/R`, zero at or beyond the radius.
pub fn falloff(distance: f32, radius: f32) -> f32 {
    if radius <= 0.0 || !(distance < radius) {
        return 0.0;
    }
    (1.0 - distance / radius).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplosionEffect {
    pub object: ObjectId,
    pub distance: f32,
    /// Falloff times the occlusion factor.
    pub scale: f32,
    pub damage: f32,
    pub force: Vec3,
    pub occluded: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExplosionReport {
    pub effects: Vec<ExplosionEffect>,
    /// Destroyable walls in range and the damage each takes.
    pub walls: Vec<(Tag, f32)>,
    pub segments: Vec<SegId>,
}

/// Segments whose extent the blast sphere reaches, walking every connected
/// side (open or walled) from the origin segment.
fn segments_in_range(level: &Level, start: SegId, center: Vec3, radius: f32) -> Vec<SegId> {
    let mut seen = HashSet::from([start]);
    let mut order = vec![start];
    let mut queue = VecDeque::from([start]);
    while let Some(seg) = queue.pop_front() {
        let Some(segment) = level.segment(seg) else {
            continue;
        };
        for (side, next) in segment.connections() {
            if seen.contains(&next) {
                continue;
            }
            let in_range = level
                .face(Tag::new(seg, side))
                .is_some_and(|face| face.distance_to(center) < radius);
            if in_range {
                seen.insert(next);
                order.push(next);
                queue.push_back(next);
            }
        }
    }
    order
}

/// Work out who and what the explosion affects.
pub fn propagate(
    level: &Level,
    objects: &ObjectPool,
    explosion: &GameExplosion,
    occlusion: Occlusion,
    stats: &mut TraversalStats,
) -> ExplosionReport {
    let mut report = ExplosionReport::default();
    if level.segment(explosion.segment).is_none() || explosion.radius <= 0.0 {
        return report;
    }
    let segments = segments_in_range(level, explosion.segment, explosion.position, explosion.radius);
    stats.segments_visited += segments.len() as u32;
    let in_range: HashSet<SegId> = segments.iter().copied().collect();

    for (id, object) in objects.iter() {
        if object.is_dead() || Some(id) == explosion.source {
            continue;
        }
        let Some(seg) = object.segment else {
            continue;
        };
        if !in_range.contains(&seg) {
            continue;
        }
        stats.objects_tested += 1;
        let offset = object.position() - explosion.position;
        let distance = offset.length();
        let base = falloff(distance, explosion.radius);
        if base <= 0.0 {
            continue;
        }
        let occluded = !visible(level, explosion.position, explosion.segment, object.position());
        let scale = match (occluded, occlusion) {
            (false, _) => base,
            (true, Occlusion::Block) => continue,
            (true, Occlusion::Muffle) => base * MUFFLE_FACTOR,
        };
        let direction = offset.try_normalize().unwrap_or(Vec3::ZERO);
        report.effects.push(ExplosionEffect {
            object: id,
            distance,
            scale,
            damage: explosion.damage * scale,
            force: direction * explosion.force * scale,
            occluded,
        });
    }

    let mut damaged: HashSet<Tag> = HashSet::new();
    for &seg in &segments {
        for side in SideId::ALL {
            let tag = Tag::new(seg, side);
            let Some(wall) = level.wall(tag) else {
                continue;
            };
            if !matches!(wall.kind, WallKind::Destroyable { hit_points } if hit_points > 0.0) {
                continue;
            }
            // One entry per wall pair; damage_wall handles both sides.
            if level.back_tag(tag).is_some_and(|back| damaged.contains(&back)) {
                continue;
            }
            let Some(face) = level.face(tag) else {
                continue;
            };
            let amount = explosion.damage * falloff(face.distance_to(explosion.position), explosion.radius);
            if amount > 0.0 {
                damaged.insert(tag);
                report.walls.push((tag, amount));
            }
        }
    }
    report.segments = segments;
    report
}

/// Apply damage and knockback. Returns the objects this blast killed.
/// Targets that disappeared since [`propagate`] are skipped with a warning.
pub fn apply(objects: &mut ObjectPool, report: &ExplosionReport) -> Vec<ObjectId> {
    let mut killed = Vec::new();
    for effect in &report.effects {
        let Some(object) = objects.get_mut(effect.object) else {
            log::warn!("Explosion target {} no longer exists", effect.object);
            continue;
        };
        apply_force(object, effect.force);
        if !object.health.is_invulnerable() && object.health.take_damage(effect.damage) {
            killed.push(effect.object);
        }
    }
    killed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::LevelBuilder;
    use crate::object::{Movement, Object, ObjectKind, PhysicsData};
    use approx::assert_abs_diff_eq;

    #[test]
    fn falloff_is_linear_and_clamped() {
        assert_abs_diff_eq!(falloff(0.0, 10.0), 1.0);
        assert_abs_diff_eq!(falloff(2.5, 10.0), 0.75);
        assert_eq!(falloff(10.0, 10.0), 0.0);
        assert_eq!(falloff(12.0, 10.0), 0.0);
        assert_eq!(falloff(1.0, 0.0), 0.0);
        assert_eq!(falloff(f32::NAN, 10.0), 0.0);
    }

    fn room_with_pillar_wall() -> (Level, SegId, SegId, SegId) {
        // a | b (open) and a | c (closed wall).
        let mut b = LevelBuilder::new();
        let a = b.add_box_segment(Vec3::splat(-5.0), Vec3::splat(5.0));
        let east = b.add_box_segment(Vec3::new(5.0, -5.0, -5.0), Vec3::new(15.0, 5.0, 5.0));
        let west = b.add_box_segment(Vec3::new(-15.0, -5.0, -5.0), Vec3::new(-5.0, 5.0, 5.0));
        b.connect(a, SideId::Right, east);
        b.connect(a, SideId::Left, west);
        b.add_wall(Tag::new(a, SideId::Left), WallKind::Closed);
        (b.build().unwrap(), a, east, west)
    }

    fn robot(pool: &mut ObjectPool, position: Vec3, seg: SegId) -> ObjectId {
        pool.spawn(
            Object::new(ObjectKind::Robot, position, 1.0)
                .with_segment(seg)
                .with_health(100.0)
                .with_movement(Movement::Physics(PhysicsData::new(2.0, 0.0))),
        )
        .unwrap()
    }

    fn blast(segment: SegId) -> GameExplosion {
        GameExplosion {
            position: Vec3::ZERO,
            segment,
            radius: 10.0,
            damage: 40.0,
            force: 100.0,
            source: None,
            sound: None,
        }
    }

    #[test]
    fn walls_block_by_default_and_muffle_when_asked() {
        let (level, a, east, west) = room_with_pillar_wall();
        let mut pool = ObjectPool::new(8);
        let open = robot(&mut pool, Vec3::new(6.0, 0.0, 0.0), east);
        let hidden = robot(&mut pool, Vec3::new(-6.0, 0.0, 0.0), west);

        let report = propagate(&level, &pool, &blast(a), Occlusion::Block, &mut TraversalStats::default());
        assert_eq!(report.effects.len(), 1);
        assert_eq!(report.effects[0].object, open);
        assert_abs_diff_eq!(report.effects[0].damage, 16.0, epsilon = 1e-4);

        let report = propagate(&level, &pool, &blast(a), Occlusion::Muffle, &mut TraversalStats::default());
        let muffled = report.effects.iter().find(|e| e.object == hidden).unwrap();
        assert!(muffled.occluded);
        assert_abs_diff_eq!(muffled.damage, 16.0 * MUFFLE_FACTOR, epsilon = 1e-4);
    }

    #[test]
    fn apply_damages_and_pushes() {
        let (level, a, east, _) = room_with_pillar_wall();
        let mut pool = ObjectPool::new(8);
        let id = robot(&mut pool, Vec3::new(6.0, 0.0, 0.0), east);
        let report = propagate(&level, &pool, &blast(a), Occlusion::Block, &mut TraversalStats::default());
        assert!(apply(&mut pool, &report).is_empty());
        let object = pool.get(id).unwrap();
        assert_abs_diff_eq!(object.health.current, 84.0, epsilon = 1e-4);
        let pushed = object.physics().unwrap().pending_force;
        assert!(pushed.x > 0.0);
        assert_abs_diff_eq!(pushed.y, 0.0);
    }

    #[test]
    fn lethal_blast_reports_kill() {
        let (level, a, east, _) = room_with_pillar_wall();
        let mut pool = ObjectPool::new(8);
        let id = robot(&mut pool, Vec3::new(6.0, 0.0, 0.0), east);
        let mut explosion = blast(a);
        explosion.damage = 1000.0;
        let report = propagate(&level, &pool, &explosion, Occlusion::Block, &mut TraversalStats::default());
        assert_eq!(apply(&mut pool, &report), vec![id]);
    }

    #[test]
    fn destroyable_walls_in_range_are_reported_once() {
        let mut b = LevelBuilder::new();
        let a = b.add_box_segment(Vec3::splat(-5.0), Vec3::splat(5.0));
        let c = b.add_box_segment(Vec3::new(5.0, -5.0, -5.0), Vec3::new(15.0, 5.0, 5.0));
        b.connect(a, SideId::Right, c);
        b.add_wall(Tag::new(a, SideId::Right), WallKind::Destroyable { hit_points: 10.0 });
        let level = b.build().unwrap();
        let report = propagate(&level, &ObjectPool::new(1), &blast(a), Occlusion::Block, &mut TraversalStats::default());
        assert_eq!(report.walls.len(), 1);
        let (tag, amount) = report.walls[0];
        assert_eq!(tag, Tag::new(a, SideId::Right));
        assert_abs_diff_eq!(amount, 20.0, epsilon = 1e-4);
    }
}
