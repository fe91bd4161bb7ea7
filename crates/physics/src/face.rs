//! Geometry queries against a single side of a segment.
//!
//! A [`Face`] is a transient view of a side with its corner positions
//! resolved. The quad is split into two triangles along the 0–2 diagonal;
//! triangle normals point into the owning segment, so queries from inside
//! the segment hit the front faces.

use crate::hit::HitInfo;
use crate::intersect::{
    barycentric, closest_point_on_triangle, point_segment_distance, ray_triangle,
    sweep_sphere_triangle, triangle_normal,
};
use crate::level::{Side, Tag};
use engine_core::{Vec2, Vec3};

/// Corner indices of the two triangles of a quad.
pub const TRIANGLES: [[usize; 3]; 2] = [[0, 1, 2], [0, 2, 3]];

#[derive(Debug, Clone, Copy)]
pub struct Face<'a> {
    pub tag: Tag,
    pub points: [Vec3; 4],
    pub side: &'a Side,
}

impl<'a> Face<'a> {
    pub fn new(tag: Tag, points: [Vec3; 4], side: &'a Side) -> Self {
        Self { tag, points, side }
    }

    pub fn triangle(&self, tri: usize) -> [Vec3; 3] {
        let [i, j, k] = TRIANGLES[tri & 1];
        [self.points[i], self.points[j], self.points[k]]
    }

    fn triangle_uvs(&self, tri: usize) -> [Vec2; 3] {
        let [i, j, k] = TRIANGLES[tri & 1];
        [self.side.uvs[i], self.side.uvs[j], self.side.uvs[k]]
    }

    /// Unit normal of one triangle, or None if it has no area.
    pub fn normal(&self, tri: usize) -> Option<Vec3> {
        triangle_normal(self.triangle(tri))
    }

    /// Plane of one triangle as (normal, point on plane).
    pub fn plane(&self, tri: usize) -> Option<(Vec3, Vec3)> {
        let [a, _, _] = self.triangle(tri);
        self.normal(tri).map(|n| (n, a))
    }

    /// Mean of the triangle normals; zero for a fully degenerate face.
    pub fn average_normal(&self) -> Vec3 {
        (0..2)
            .filter_map(|tri| self.normal(tri))
            .sum::<Vec3>()
            .normalize_or_zero()
    }

    pub fn center(&self) -> Vec3 {
        self.points.iter().copied().sum::<Vec3>() / 4.0
    }

    /// Radius of a sphere around [`Face::center`] enclosing the quad.
    pub fn bounding_radius(&self) -> f32 {
        let center = self.center();
        self.points
            .iter()
            .map(|p| p.distance(center))
            .fold(0.0, f32::max)
    }

    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        let a = closest_point_on_triangle(p, self.triangle(0));
        let b = closest_point_on_triangle(p, self.triangle(1));
        if a.distance_squared(p) <= b.distance_squared(p) {
            a
        } else {
            b
        }
    }

    pub fn distance_to(&self, p: Vec3) -> f32 {
        self.closest_point(p).distance(p)
    }

    /// Minimum distance from `p` to the four boundary edges of the quad.
    pub fn edge_distance(&self, p: Vec3) -> f32 {
        (0..4)
            .map(|i| point_segment_distance(p, self.points[i], self.points[(i + 1) % 4]))
            .fold(f32::MAX, f32::min)
    }

    /// Texture coordinate at barycentrics `(u, v)` of a triangle.
    pub fn uv_at(&self, tri: usize, u: f32, v: f32) -> Vec2 {
        let [a, b, c] = self.triangle_uvs(tri);
        a * (1.0 - u - v) + b * u + c * v
    }

    /// Nearest front-face hit of a ray within `max_distance`.
    ///
    /// `only_triangle` restricts the test to one of the two triangles.
    pub fn intersect_ray(
        &self,
        origin: Vec3,
        dir: Vec3,
        max_distance: f32,
        only_triangle: Option<usize>,
    ) -> Option<HitInfo> {
        let mut best: Option<HitInfo> = None;
        for tri in 0..2 {
            if only_triangle.is_some_and(|only| only != tri) {
                continue;
            }
            let Some(normal) = self.normal(tri) else {
                continue;
            };
            let Some(hit) = ray_triangle(origin, dir, self.triangle(tri), true) else {
                continue;
            };
            if hit.t > max_distance || best.is_some_and(|b| b.distance <= hit.t) {
                continue;
            }
            let point = origin + dir * hit.t;
            best = Some(HitInfo {
                distance: hit.t,
                point,
                normal,
                triangle: Some(tri as u8),
                uv: self.uv_at(tri, hit.u, hit.v),
                edge_distance: self.edge_distance(point),
            });
        }
        best
    }

    /// Earliest contact of a sphere of `radius` swept from `origin` along
    /// `dir` for up to `max_distance`.
    ///
    /// `distance` is how far the center travels; `point` is the contact on
    /// the face and `normal` points from the face towards the sphere.
    pub fn sweep_sphere(
        &self,
        origin: Vec3,
        dir: Vec3,
        max_distance: f32,
        radius: f32,
    ) -> Option<HitInfo> {
        if radius <= 0.0 {
            return self.intersect_ray(origin, dir, max_distance, None);
        }
        let mut best: Option<HitInfo> = None;
        for tri in 0..2 {
            let corners = self.triangle(tri);
            let Some(hit) = sweep_sphere_triangle(origin, dir, max_distance, radius, corners) else {
                continue;
            };
            if best.is_some_and(|b| b.distance <= hit.t) {
                continue;
            }
            let (u, v) = barycentric(hit.point, corners).unwrap_or((0.0, 0.0));
            best = Some(HitInfo {
                distance: hit.t,
                point: hit.point,
                normal: hit.normal,
                triangle: Some(tri as u8),
                uv: self.uv_at(tri, u, v),
                edge_distance: self.edge_distance(hit.point),
            });
        }
        best
    }

    /// True if a sphere overlaps the face.
    pub fn overlaps_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.distance_to(center) < radius
    }
}
