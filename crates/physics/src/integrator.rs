//! Fixed-step object integration with collision response.
//!
//! Each tick a physics object:
//! 1. folds thrust, pending forces and gravity into its velocity, with
//!    per-tick drag damping,
//! 2. integrates its orientation from angular velocity,
//! 3. sweeps its sphere from the old to the predicted position through the
//!    level and responds to the first contact (bounce, slide or stick),
//!    repeating with the leftover time a bounded number of times,
//! 4. resyncs its segment, freezing it if it left the level.

use crate::config::SimConfig;
use crate::hit::LevelHit;
use crate::intersect::EPSILON;
use crate::level::Level;
use crate::object::{Movement, Object, ObjectKind, ObjectPool, PathFollow, PhysicsData, PhysicsFlags};
use crate::traversal::{sweep_level, QuerySource, Ray, RayQuery, TraversalStats};
use engine_core::{ObjectId, Quat, Transform, Vec3};

/// Drag coefficients are expressed per tick at this rate.
pub const DRAG_REFERENCE_RATE: f32 = 64.0;

/// Gap left between a resting object and the surface it touched.
pub const CONTACT_SKIN: f32 = 1e-3;

/// Collision responses per object per tick.
pub const MAX_MOVE_ITERATIONS: usize = 3;

const MIN_MASS: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepParams {
    pub dt: f32,
    pub restitution: f32,
    pub gravity: Vec3,
}

impl StepParams {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            dt: config.timestep(),
            restitution: config.restitution,
            gravity: config.gravity,
        }
    }
}

/// A collision an object had this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub object: ObjectId,
    pub hit: LevelHit,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub contacts: Vec<Contact>,
    /// Objects that left the level this tick.
    pub left_level: Vec<ObjectId>,
}

/// Queue a force for the next tick. Returns false for non-physics objects.
pub fn apply_force(object: &mut Object, force: Vec3) -> bool {
    match object.physics_mut() {
        Some(data) => {
            data.pending_force += force;
            true
        }
        None => false,
    }
}

pub fn apply_rotational_force(object: &mut Object, torque: Vec3) -> bool {
    match object.physics_mut() {
        Some(data) => {
            data.pending_torque += torque;
            true
        }
        None => false,
    }
}

/// Set angular velocity so the object's forward axis turns towards `target`
/// at `rate` radians per second, without overshooting within one tick.
///
/// Replaces any existing angular velocity.
pub fn turn_towards_vector(object: &mut Object, target: Vec3, rate: f32, dt: f32) -> bool {
    let Some(target) = target.try_normalize() else {
        return false;
    };
    let forward = object.transform.forward();
    let angle = forward.dot(target).clamp(-1.0, 1.0).acos();
    let angular_velocity = if angle < EPSILON {
        Vec3::ZERO
    } else {
        // Facing exactly away: any perpendicular axis works.
        let axis = forward
            .cross(target)
            .try_normalize()
            .unwrap_or_else(|| object.transform.up());
        let speed = if dt > 0.0 { rate.min(angle / dt) } else { rate };
        axis * speed
    };
    match &mut object.movement {
        Movement::Physics(data) => data.angular_velocity = angular_velocity,
        Movement::Spinning { angular_velocity: w } => *w = angular_velocity,
        _ => return false,
    }
    true
}

/// Apply forces, gravity and drag to velocities, consuming pending forces.
pub fn integrate_velocity(data: &mut PhysicsData, gravity: Vec3, dt: f32) {
    let scaled = dt * DRAG_REFERENCE_RATE;
    let inv_mass = 1.0 / data.mass.max(MIN_MASS);

    let mut accel = (data.thrust + data.pending_force) * inv_mass;
    if data.flags.contains(PhysicsFlags::GRAVITY) {
        accel += gravity;
    }
    let damping = (1.0 - data.drag.clamp(0.0, 1.0)).powf(scaled);
    data.velocity = data.velocity * damping + accel * dt;

    let angular_damping = (1.0 - data.angular_drag.clamp(0.0, 1.0)).powf(scaled);
    data.angular_velocity = data.angular_velocity * angular_damping
        + (data.angular_thrust + data.pending_torque) * inv_mass * dt;

    data.pending_force = Vec3::ZERO;
    data.pending_torque = Vec3::ZERO;
}

pub fn integrate_rotation(rotation: Quat, angular_velocity: Vec3, dt: f32) -> Quat {
    if angular_velocity.length_squared() < EPSILON * EPSILON {
        return rotation;
    }
    (Quat::from_scaled_axis(angular_velocity * dt) * rotation).normalize()
}

/// Velocity after touching a surface with `normal`.
///
/// Bouncing reverses the normal component scaled by `restitution`; sliding
/// removes it. The tangential component is kept either way, and velocity
/// already leaving the surface is returned unchanged.
pub fn respond(velocity: Vec3, normal: Vec3, restitution: f32, bounce: bool) -> Vec3 {
    let normal_speed = velocity.dot(normal);
    if normal_speed >= 0.0 {
        return velocity;
    }
    if bounce {
        velocity - normal * normal_speed * (1.0 + restitution)
    } else {
        velocity - normal * normal_speed
    }
}

fn resync_segment(level: &Level, object: &mut Object) {
    object.segment = level.find_segment(object.transform.position, object.segment);
}

fn follow_path(path: &mut PathFollow, transform: &mut Transform, dt: f32) {
    let mut budget = path.speed.max(0.0) * dt;
    for _ in 0..=path.waypoints.len() {
        if budget <= 0.0 || path.is_finished() {
            break;
        }
        let target = path.waypoints[path.next];
        let to_target = target - transform.position;
        let distance = to_target.length();
        if distance > EPSILON {
            transform.rotation = Transform::rotation_towards(to_target);
        }
        if distance <= budget {
            transform.position = target;
            budget -= distance;
            path.next += 1;
            if path.looping && path.is_finished() {
                path.next = 0;
            }
        } else {
            transform.position += to_target / distance * budget;
            budget = 0.0;
        }
    }
}

fn move_physics(
    level: &Level,
    objects: &ObjectPool,
    id: ObjectId,
    object: &mut Object,
    params: &StepParams,
    stats: &mut TraversalStats,
) -> Vec<LevelHit> {
    let mut contacts = Vec::new();
    let Some(mut data) = object.physics().cloned() else {
        return contacts;
    };
    if data.stuck_to.is_some() {
        data.velocity = Vec3::ZERO;
        data.pending_force = Vec3::ZERO;
        data.pending_torque = Vec3::ZERO;
        object.movement = Movement::Physics(data);
        return contacts;
    }

    let dt = params.dt;
    integrate_velocity(&mut data, params.gravity, dt);
    object.transform.rotation = integrate_rotation(object.transform.rotation, data.angular_velocity, dt);

    let source = QuerySource::of(id, object, objects);
    let is_weapon = object.kind == ObjectKind::Weapon;
    let piercing = data.flags.contains(PhysicsFlags::PIERCING);
    let mut hit_objects = true;
    let mut remaining = dt;

    for _ in 0..MAX_MOVE_ITERATIONS {
        let Some(seg) = object.segment else {
            break;
        };
        let displacement = data.velocity * remaining;
        let distance = displacement.length();
        if distance < EPSILON {
            break;
        }
        let ray = Ray {
            origin: object.transform.position,
            direction: displacement / distance,
        };
        let mut query = RayQuery::new(seg, distance + CONTACT_SKIN);
        if hit_objects {
            query = query.with_objects(Some(source));
        }
        let mut hit = LevelHit::default();
        if !sweep_level(level, Some(objects), &ray, object.radius, &query, &mut hit, stats) {
            object.transform.position += displacement;
            resync_segment(level, object);
            break;
        }
        hit.speed = (-data.velocity.dot(hit.normal)).max(0.0);

        if hit.object.is_some() && is_weapon && piercing {
            // Keep flying; the target is damaged by the contact.
            contacts.push(hit);
            hit_objects = false;
            continue;
        }

        let travelled = hit.distance.min(distance);
        remaining *= 1.0 - travelled / distance;
        object.transform.position = hit.point + hit.normal * (object.radius + CONTACT_SKIN);
        resync_segment(level, object);

        if let Some(tag) = hit.tag {
            if data.flags.contains(PhysicsFlags::STICK) {
                data.velocity = Vec3::ZERO;
                data.stuck_to = Some(tag);
                contacts.push(hit);
                break;
            }
            if data.can_bounce() {
                data.velocity = respond(data.velocity, hit.normal, params.restitution, true);
                if let Some(left) = data.bounces_left.as_mut() {
                    *left = left.saturating_sub(1);
                }
                hit.bounced = true;
            } else {
                data.velocity = respond(data.velocity, hit.normal, params.restitution, false);
            }
        } else {
            data.velocity = respond(data.velocity, hit.normal, params.restitution, false);
        }
        contacts.push(hit);
        if is_weapon && !hit.bounced {
            // Weapons detonate on impact.
            break;
        }
    }

    object.movement = Movement::Physics(data);
    contacts
}

/// Advance one object by a tick. `objects` is the pool as seen by this
/// object's collision queries; the object itself is passed separately.
pub fn step_object(
    level: &Level,
    objects: &ObjectPool,
    id: ObjectId,
    object: &mut Object,
    params: &StepParams,
    stats: &mut TraversalStats,
) -> Vec<LevelHit> {
    object.last_transform = object.transform;
    if object.is_dead() || object.is_outside_level() {
        return Vec::new();
    }
    if matches!(object.movement, Movement::Physics(_)) {
        return move_physics(level, objects, id, object, params, stats);
    }
    let dt = params.dt;
    match &mut object.movement {
        Movement::None | Movement::Physics(_) => Vec::new(),
        Movement::Spinning { angular_velocity } => {
            object.transform.rotation =
                integrate_rotation(object.transform.rotation, *angular_velocity, dt);
            Vec::new()
        }
        Movement::Path(path) => {
            follow_path(path, &mut object.transform, dt);
            object.segment = level.find_segment(object.transform.position, object.segment);
            Vec::new()
        }
    }
}

/// Advance every object by one tick, in pool storage order.
pub fn step_objects(
    level: &Level,
    objects: &mut ObjectPool,
    params: &StepParams,
    stats: &mut TraversalStats,
) -> StepReport {
    let mut report = StepReport::default();
    for id in objects.ids() {
        let Some(mut object) = objects.snapshot(id) else {
            continue;
        };
        let was_outside = object.is_outside_level();
        let hits = step_object(level, objects, id, &mut object, params, stats);
        if !was_outside && object.is_outside_level() {
            log::warn!(
                "{} ({:?}) left the level at {:?}; frozen",
                id,
                object.kind,
                object.position()
            );
            report.left_level.push(id);
        }
        report
            .contacts
            .extend(hits.into_iter().map(|hit| Contact { object: id, hit }));
        if let Some(slot) = objects.get_mut(id) {
            *slot = object;
        }
    }
    report
}
