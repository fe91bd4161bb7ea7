//! Collision Properties - Tunneling, Closest Hit, Tangents, Bounce, Falloff
//!
//! Whole-simulation checks over small box levels.

use approx::assert_abs_diff_eq;
use engine_core::{ControlInput, Vec3};
use physics::hit::tangent_for;
use physics::{
    GameExplosion, Level, LevelBuilder, Movement, Object, ObjectKind, Occlusion, PhysicsData,
    PhysicsFlags, SegId, SideId, SimConfig, SimEvent, Simulation, Tag, WallKind,
};

const TOLERANCE: f32 = 1e-3;

/// Three 10-unit boxes along X: west | a | east. The west side is walled.
fn three_rooms() -> Level {
    let mut b = LevelBuilder::new();
    let a = b.add_box_segment(Vec3::splat(-5.0), Vec3::splat(5.0));
    let east = b.add_box_segment(Vec3::new(5.0, -5.0, -5.0), Vec3::new(15.0, 5.0, 5.0));
    let west = b.add_box_segment(Vec3::new(-15.0, -5.0, -5.0), Vec3::new(-5.0, 5.0, 5.0));
    b.connect(a, SideId::Right, east);
    b.connect(a, SideId::Left, west);
    b.add_wall(Tag::new(a, SideId::Left), WallKind::Closed);
    b.build().expect("valid level")
}

fn mover(position: Vec3, radius: f32, velocity: Vec3, flags: PhysicsFlags) -> Object {
    Object::new(ObjectKind::Debris, position, radius).with_movement(Movement::Physics(
        PhysicsData::new(1.0, 0.0)
            .with_velocity(velocity)
            .with_flags(flags),
    ))
}

fn robot(position: Vec3) -> Object {
    Object::new(ObjectKind::Robot, position, 1.0).with_health(100.0)
}

fn wall_hits(events: &[SimEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, SimEvent::WallHit { .. }))
        .count()
}

// ============================================================================
// No tunneling
// ============================================================================

#[test]
fn test_fast_objects_never_leave_the_rooms() {
    let directions = [
        Vec3::X,
        Vec3::new(1.0, 0.3, 0.2),
        Vec3::new(1.0, -0.7, 0.1),
        Vec3::new(-1.0, 0.05, 0.0),
        Vec3::new(0.2, 0.0, 1.0),
    ];
    // Up to 9.375 units per tick, under the 10-unit segment extent.
    for speed in [64.0, 300.0, 600.0] {
        for radius in [0.0, 0.5] {
            for direction in directions {
                let mut sim = Simulation::new(three_rooms(), SimConfig::default());
                let velocity = direction.normalize() * speed;
                let id = sim
                    .spawn(mover(Vec3::ZERO, radius, velocity, PhysicsFlags::NONE))
                    .unwrap();
                let mut hits = 0;
                for _ in 0..64 {
                    sim.tick(&ControlInput::idle());
                    hits += wall_hits(&sim.drain_events());
                    let object = sim.objects().get(id).unwrap();
                    let p = object.position();
                    assert!(object.segment.is_some(), "left the level at {p:?}");
                    assert!(p.x <= 15.0 + TOLERANCE && p.x >= -5.0 - TOLERANCE, "{p:?}");
                    assert!(p.y.abs() <= 5.0 + TOLERANCE && p.z.abs() <= 5.0 + TOLERANCE, "{p:?}");
                }
                assert!(hits > 0, "no wall hit at speed {speed} along {direction:?}");
            }
        }
    }
}

// ============================================================================
// Closest hit
// ============================================================================

#[test]
fn test_ray_reports_object_in_front_of_wall() {
    let mut sim = Simulation::new(three_rooms(), SimConfig::default());
    let target = sim.spawn(robot(Vec3::new(8.0, 0.0, 0.0))).unwrap();

    let hit = sim.trace_ray(Vec3::ZERO, Vec3::X, 100.0);
    assert_eq!(hit.object, Some(target));
    assert_eq!(hit.tag, None);
    assert_abs_diff_eq!(hit.distance, 7.0, epsilon = 1e-4);

    sim.objects_mut().remove(target);
    let hit = sim.trace_ray(Vec3::ZERO, Vec3::X, 100.0);
    assert_eq!(hit.object, None);
    assert_eq!(hit.tag, Some(Tag::new(SegId(1), SideId::Right)));
    assert_abs_diff_eq!(hit.distance, 15.0, epsilon = 1e-4);
}

#[test]
fn test_ray_reports_wall_in_front_of_object() {
    let mut sim = Simulation::new(three_rooms(), SimConfig::default());
    sim.spawn(robot(Vec3::new(-8.0, 0.0, 0.0))).unwrap();

    let hit = sim.trace_ray(Vec3::ZERO, -Vec3::X, 100.0);
    assert_eq!(hit.object, None);
    assert_eq!(hit.tag, Some(Tag::new(SegId(0), SideId::Left)));
    assert_abs_diff_eq!(hit.distance, 5.0, epsilon = 1e-4);
}

#[test]
fn test_ray_beyond_range_misses() {
    let mut sim = Simulation::new(three_rooms(), SimConfig::default());
    let hit = sim.trace_ray(Vec3::ZERO, Vec3::X, 10.0);
    assert!(!hit.is_hit());
    assert_eq!(hit.distance, f32::MAX);
}

// ============================================================================
// Tangents
// ============================================================================

#[test]
fn test_tangent_is_unit_and_perpendicular() {
    let normals = [
        Vec3::Y,
        -Vec3::Y,
        Vec3::X,
        -Vec3::Z,
        Vec3::new(1.0, 1.0, 0.0).normalize(),
        Vec3::new(0.0, 1.0, 1e-7).normalize(),
        Vec3::new(-0.3, 0.2, 0.9).normalize(),
    ];
    for normal in normals {
        let tangent = tangent_for(normal);
        assert!(tangent.is_finite(), "NaN tangent for {normal:?}");
        assert_abs_diff_eq!(tangent.length(), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(tangent.dot(normal), 0.0, epsilon = 1e-5);
    }
}

#[test]
fn test_floor_hit_has_valid_tangent() {
    let mut sim = Simulation::new(three_rooms(), SimConfig::default());
    let hit = sim.trace_ray(Vec3::ZERO, -Vec3::Y, 100.0);
    assert_eq!(hit.normal, Vec3::Y);
    assert!(hit.tangent.is_finite());
    assert_abs_diff_eq!(hit.tangent.length(), 1.0, epsilon = 1e-5);
    assert_abs_diff_eq!(hit.tangent.dot(hit.normal), 0.0, epsilon = 1e-5);
}

// ============================================================================
// Bounce
// ============================================================================

#[test]
fn test_bounce_reverses_normal_velocity_scaled_by_restitution() {
    let config = SimConfig {
        restitution: 0.5,
        ..SimConfig::default()
    };
    let mut sim = Simulation::new(three_rooms(), config);
    // Glancing approach to the east room's far wall.
    let id = sim
        .spawn(mover(
            Vec3::new(12.0, 0.0, 0.0),
            0.5,
            Vec3::new(32.0, 8.0, 0.0),
            PhysicsFlags::BOUNCE,
        ))
        .unwrap();

    let mut bounced = false;
    for _ in 0..16 {
        sim.tick(&ControlInput::idle());
        bounced = sim
            .drain_events()
            .iter()
            .any(|e| matches!(e, SimEvent::WallHit { bounced: true, .. }));
        if bounced {
            break;
        }
    }
    assert!(bounced);
    let velocity = sim.objects().get(id).unwrap().velocity();
    assert_abs_diff_eq!(velocity.x, -16.0, epsilon = 1e-3);
    assert_abs_diff_eq!(velocity.y, 8.0, epsilon = 1e-3);
    assert_abs_diff_eq!(velocity.z, 0.0, epsilon = 1e-3);
}

#[test]
fn test_without_bounce_flag_objects_slide() {
    let mut sim = Simulation::new(three_rooms(), SimConfig::default());
    let id = sim
        .spawn(mover(
            Vec3::new(12.0, 0.0, 0.0),
            0.5,
            Vec3::new(32.0, 8.0, 0.0),
            PhysicsFlags::NONE,
        ))
        .unwrap();
    for _ in 0..8 {
        sim.tick(&ControlInput::idle());
    }
    let velocity = sim.objects().get(id).unwrap().velocity();
    assert_abs_diff_eq!(velocity.x, 0.0, epsilon = 1e-3);
    assert_abs_diff_eq!(velocity.y, 8.0, epsilon = 1e-3);
}

// ============================================================================
// Explosion falloff
// ============================================================================

fn blast_at_origin(damage: f32) -> GameExplosion {
    GameExplosion {
        position: Vec3::ZERO,
        segment: SegId(0),
        radius: 10.0,
        damage,
        force: 0.0,
        source: None,
        sound: None,
    }
}

#[test]
fn test_explosion_damage_falls_off_linearly() {
    let mut sim = Simulation::new(three_rooms(), SimConfig::default());
    let near = sim.spawn(robot(Vec3::new(4.0, 0.0, 0.0))).unwrap();
    let edge = sim.spawn(robot(Vec3::new(10.0, 0.0, 0.0))).unwrap();
    let far = sim.spawn(robot(Vec3::new(12.0, 0.0, 0.0))).unwrap();

    sim.queue_explosion(blast_at_origin(50.0));
    sim.tick(&ControlInput::idle());

    let health = |id| sim.objects().get(id).unwrap().health.current;
    assert_abs_diff_eq!(health(near), 100.0 - 50.0 * 0.6, epsilon = 1e-3);
    assert_eq!(health(edge), 100.0);
    assert_eq!(health(far), 100.0);
}

#[test]
fn test_walls_shield_from_explosions() {
    let mut sim = Simulation::new(three_rooms(), SimConfig::default());
    let hidden = sim.spawn(robot(Vec3::new(-8.0, 0.0, 0.0))).unwrap();
    sim.queue_explosion(blast_at_origin(50.0));
    sim.tick(&ControlInput::idle());
    assert_eq!(sim.objects().get(hidden).unwrap().health.current, 100.0);
}

#[test]
fn test_muffled_explosions_leak_through_walls() {
    let config = SimConfig {
        occlusion: Occlusion::Muffle,
        ..SimConfig::default()
    };
    let mut sim = Simulation::new(three_rooms(), config);
    let hidden = sim.spawn(robot(Vec3::new(-8.0, 0.0, 0.0))).unwrap();
    sim.queue_explosion(blast_at_origin(50.0));
    sim.tick(&ControlInput::idle());
    let expected = 100.0 - 50.0 * 0.2 * physics::explosion::MUFFLE_FACTOR;
    assert_abs_diff_eq!(sim.objects().get(hidden).unwrap().health.current, expected, epsilon = 1e-3);
}
