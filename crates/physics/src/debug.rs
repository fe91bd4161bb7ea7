//! Diagnostics counters and the debug-draw boundary to the renderer.

use crate::hit::LevelHit;
use crate::traversal::TraversalStats;
use engine_core::Vec3;

pub type Color = [f32; 4];

pub const HIT_COLOR: Color = [1.0, 0.2, 0.2, 1.0];
pub const NORMAL_COLOR: Color = [0.2, 1.0, 0.2, 1.0];
pub const TANGENT_COLOR: Color = [0.2, 0.4, 1.0, 1.0];

/// Line drawing implemented by the renderer's debug overlay.
pub trait DebugDraw {
    fn line(&mut self, from: Vec3, to: Vec3, color: Color);

    /// Axis-aligned cross.
    fn point(&mut self, at: Vec3, size: f32, color: Color) {
        for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
            self.line(at - axis * size, at + axis * size, color);
        }
    }
}

/// Draw a hit's point, normal and tangent. Draws nothing for a miss.
pub fn draw_hit(draw: &mut dyn DebugDraw, hit: &LevelHit, scale: f32) {
    if !hit.is_hit() {
        return;
    }
    draw.point(hit.point, scale * 0.25, HIT_COLOR);
    draw.line(hit.point, hit.point + hit.normal * scale, NORMAL_COLOR);
    draw.line(hit.point, hit.point + hit.tangent * scale, TANGENT_COLOR);
}

/// Collects lines in memory; used by headless runs and tests.
#[derive(Debug, Default)]
pub struct LineRecorder {
    pub lines: Vec<(Vec3, Vec3, Color)>,
}

impl DebugDraw for LineRecorder {
    fn line(&mut self, from: Vec3, to: Vec3, color: Color) {
        self.lines.push((from, to, color));
    }
}

/// Running counters for the simulation, owned by the simulation context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub frames: u64,
    pub ticks: u64,
    /// Frames whose accumulated time hit the catch-up clamp.
    pub clamped_frames: u64,
    pub queries: u64,
    pub segments_visited: u64,
    pub faces_tested: u64,
    pub objects_tested: u64,
    pub wall_hits: u64,
    pub object_hits: u64,
    pub explosions: u64,
}

impl Diagnostics {
    pub fn record_traversal(&mut self, stats: &TraversalStats) {
        self.queries += u64::from(stats.queries);
        self.segments_visited += u64::from(stats.segments_visited);
        self.faces_tested += u64::from(stats.faces_tested);
        self.objects_tested += u64::from(stats.objects_tested);
    }

    pub fn log_summary(&self) {
        log::info!(
            "{} frames, {} ticks ({} clamped), {} queries, {} segments, {} faces, {} objects tested, {} wall hits, {} object hits, {} explosions",
            self.frames,
            self.ticks,
            self.clamped_frames,
            self.queries,
            self.segments_visited,
            self.faces_tested,
            self.objects_tested,
            self.wall_hits,
            self.object_hits,
            self.explosions
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hit::{HitInfo, HitTarget};
    use crate::level::{SegId, SideId, Tag};
    use engine_core::Vec2;

    #[test]
    fn miss_draws_nothing() {
        let mut recorder = LineRecorder::default();
        draw_hit(&mut recorder, &LevelHit::default(), 1.0);
        assert!(recorder.lines.is_empty());
    }

    #[test]
    fn hit_draws_point_normal_and_tangent() {
        let mut hit = LevelHit::default();
        hit.update(
            &HitInfo {
                distance: 2.0,
                point: Vec3::new(2.0, 0.0, 0.0),
                normal: -Vec3::X,
                triangle: Some(0),
                uv: Vec2::ZERO,
                edge_distance: 1.0,
            },
            HitTarget::Face(Tag::new(SegId(0), SideId::Right)),
        );
        let mut recorder = LineRecorder::default();
        draw_hit(&mut recorder, &hit, 1.0);
        assert_eq!(recorder.lines.len(), 5);
        let (from, to, color) = recorder.lines[3];
        assert_eq!(color, NORMAL_COLOR);
        assert_eq!(to - from, -Vec3::X);
    }

    #[test]
    fn traversal_stats_accumulate() {
        let mut diagnostics = Diagnostics::default();
        let stats = TraversalStats {
            queries: 1,
            segments_visited: 3,
            faces_tested: 12,
            objects_tested: 2,
        };
        diagnostics.record_traversal(&stats);
        diagnostics.record_traversal(&stats);
        assert_eq!(diagnostics.queries, 2);
        assert_eq!(diagnostics.segments_visited, 6);
        assert_eq!(diagnostics.faces_tested, 24);
        assert_eq!(diagnostics.objects_tested, 4);
    }
}
