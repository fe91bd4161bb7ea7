//! Primitive intersection tests used by the face and traversal layers.
//!
//! The geometry runs through rapier's collision layer (parry). This module
//! converts between the engine's `glam` types and parry's nalgebra types and
//! keeps the engine's conventions: unit ray directions, distances in world
//! units, and `None` instead of a panic for degenerate input.

use engine_core::Vec3;
use rapier3d::na::{Isometry3, Point3, Vector3};
use rapier3d::parry::query::{
    self, PointQuery, PointQueryWithLocation, Ray, RayCast, ShapeCastOptions,
};
use rapier3d::parry::shape::{Ball, Segment, Triangle};

/// Length threshold below which geometry counts as degenerate.
pub const EPSILON: f32 = 1e-6;

pub fn point(v: Vec3) -> Point3<f32> {
    Point3::new(v.x, v.y, v.z)
}

pub fn vector(v: Vec3) -> Vector3<f32> {
    Vector3::new(v.x, v.y, v.z)
}

pub fn from_point(p: &Point3<f32>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

pub fn from_vector(v: &Vector3<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn ray(origin: Vec3, dir: Vec3) -> Ray {
    Ray::new(point(origin), vector(dir))
}

fn translation(v: Vec3) -> Isometry3<f32> {
    Isometry3::translation(v.x, v.y, v.z)
}

pub fn triangle([a, b, c]: [Vec3; 3]) -> Triangle {
    Triangle::new(point(a), point(b), point(c))
}

/// Ray/triangle hit: distance along the ray plus barycentrics of `b` and `c`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    pub t: f32,
    pub u: f32,
    pub v: f32,
}

impl TriangleHit {
    /// Interpolate per-vertex values with this hit's barycentrics.
    pub fn interpolate<T>(&self, a: T, b: T, c: T) -> T
    where
        T: std::ops::Mul<f32, Output = T> + std::ops::Add<Output = T>,
    {
        a * (1.0 - self.u - self.v) + b * self.u + c * self.v
    }
}

/// Unit normal of a counter-clockwise triangle, or None if it has no area.
pub fn triangle_normal(corners: [Vec3; 3]) -> Option<Vec3> {
    let scaled = triangle(corners).scaled_normal();
    let len = scaled.norm();
    if len < EPSILON || !len.is_finite() {
        None
    } else {
        Some(from_vector(&(scaled / len)))
    }
}

/// Barycentrics `(u, v)` of the point of the triangle nearest to `p`.
pub fn barycentric(p: Vec3, corners: [Vec3; 3]) -> Option<(f32, f32)> {
    triangle_normal(corners)?;
    let (_, location) = triangle(corners).project_local_point_and_get_location(&point(p), false);
    location.barycentric_coordinates().map(|[_, u, v]| (u, v))
}

/// Ray/triangle intersection.
///
/// With `front_only`, only triangles whose normal opposes the ray direction
/// are hit (the ray enters through the front face).
pub fn ray_triangle(
    origin: Vec3,
    dir: Vec3,
    corners: [Vec3; 3],
    front_only: bool,
) -> Option<TriangleHit> {
    let normal = triangle_normal(corners)?;
    if front_only && dir.dot(normal) > -EPSILON {
        return None;
    }
    let t = triangle(corners).cast_local_ray(&ray(origin, dir), f32::MAX, true)?;
    if !t.is_finite() {
        return None;
    }
    let (u, v) = barycentric(origin + dir * t, corners)?;
    Some(TriangleHit { t, u, v })
}

/// Earliest non-negative distance at which a ray touches a sphere.
///
/// A ray starting inside the sphere reports 0.
pub fn ray_sphere(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    if !(radius > 0.0) {
        return None;
    }
    Ball::new(radius).cast_ray(&translation(center), &ray(origin, dir), f32::MAX, true)
}

pub fn closest_point_on_segment(p: Vec3, a: Vec3, b: Vec3) -> Vec3 {
    let projection = Segment::new(point(a), point(b)).project_local_point(&point(p), true);
    from_point(&projection.point)
}

pub fn point_segment_distance(p: Vec3, a: Vec3, b: Vec3) -> f32 {
    Segment::new(point(a), point(b)).distance_to_local_point(&point(p), true)
}

/// Closest point on a triangle to `p`.
pub fn closest_point_on_triangle(p: Vec3, corners: [Vec3; 3]) -> Vec3 {
    let [a, b, c] = corners;
    if triangle_normal(corners).is_none() {
        // No area: the nearest of the three edges.
        return [(a, b), (b, c), (c, a)]
            .into_iter()
            .map(|(x, y)| closest_point_on_segment(p, x, y))
            .min_by(|x, y| x.distance_squared(p).total_cmp(&y.distance_squared(p)))
            .unwrap_or(a);
    }
    from_point(&triangle(corners).project_local_point(&point(p), true).point)
}

/// Contact of a swept sphere with a triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHit {
    /// Distance the center travels before touching.
    pub t: f32,
    /// Contact point on the triangle.
    pub point: Vec3,
    /// Unit normal from the triangle towards the sphere center.
    pub normal: Vec3,
}

/// Earliest contact of a sphere of `radius` swept from `origin` along the
/// unit direction `dir` for up to `max_distance`.
///
/// Only contacts the sphere moves into are reported. A sphere whose center
/// is behind the triangle's plane and that does not already touch it is
/// never hit.
pub fn sweep_sphere_triangle(
    origin: Vec3,
    dir: Vec3,
    max_distance: f32,
    radius: f32,
    corners: [Vec3; 3],
) -> Option<SweepHit> {
    let normal = triangle_normal(corners)?;
    let tri = triangle(corners);

    let nearest = closest_point_on_triangle(origin, corners);
    let offset = origin - nearest;
    if offset.length() < radius {
        if (nearest - origin).dot(dir) <= EPSILON {
            return None;
        }
        return Some(SweepHit {
            t: 0.0,
            point: nearest,
            normal: offset.try_normalize().unwrap_or(normal),
        });
    }
    if (origin - corners[0]).dot(normal) < 0.0 {
        return None;
    }

    // Interior contact: the center crosses the triangle lifted by `radius`.
    // When that happens no edge can be touched earlier.
    if dir.dot(normal) < -EPSILON {
        let lifted = corners.map(|c| c + normal * radius);
        if let Some(hit) = ray_triangle(origin, dir, lifted, true) {
            if hit.t > max_distance {
                return None;
            }
            let center = origin + dir * hit.t;
            return Some(SweepHit {
                t: hit.t,
                point: center - normal * radius,
                normal,
            });
        }
    }

    // Edge or corner contact.
    let options = ShapeCastOptions {
        stop_at_penetration: false,
        ..ShapeCastOptions::with_max_time_of_impact(max_distance)
    };
    let hit = query::cast_shapes(
        &translation(origin),
        &vector(dir),
        &Ball::new(radius),
        &Isometry3::identity(),
        &Vector3::zeros(),
        &tri,
        options,
    )
    .ok()
    .flatten()?;
    let contact_normal = -from_vector(&hit.normal1.into_inner());
    if contact_normal.dot(dir) >= -EPSILON || hit.time_of_impact > max_distance {
        return None;
    }
    Some(SweepHit {
        t: hit.time_of_impact,
        point: from_point(&hit.witness2),
        normal: contact_normal.try_normalize().unwrap_or(normal),
    })
}
