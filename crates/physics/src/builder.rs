//! Programmatic level construction.
//!
//! Used by level loaders, tests and the demo level. Geometry is added
//! segment by segment; connections and walls are always made symmetric.

use crate::level::{
    Level, LevelError, SegId, Segment, SideId, Tag, TexId, TextureInfo, Wall, WallId, WallKind,
};
use engine_core::Vec3;

/// Incrementally builds a [`Level`].
#[derive(Debug, Clone)]
pub struct LevelBuilder {
    vertices: Vec<Vec3>,
    segments: Vec<Segment>,
    walls: Vec<Wall>,
    textures: Vec<TextureInfo>,
}

impl Default for LevelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelBuilder {
    /// Start a level. Texture 0 is a plain opaque texture.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            segments: Vec::new(),
            walls: Vec::new(),
            textures: vec![TextureInfo::opaque("default")],
        }
    }

    pub fn add_texture(&mut self, info: TextureInfo) -> TexId {
        self.textures.push(info);
        TexId((self.textures.len() - 1) as u16)
    }

    /// Add a segment from its eight corners (slot layout of [`crate::SIDE_VERTS`]).
    pub fn add_segment(&mut self, corners: [Vec3; 8]) -> SegId {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&corners);
        let verts = std::array::from_fn(|i| base + i as u32);
        self.segments.push(Segment::new(verts));
        SegId((self.segments.len() - 1) as u32)
    }

    /// Add an axis-aligned box segment.
    pub fn add_box_segment(&mut self, min: Vec3, max: Vec3) -> SegId {
        let (x0, y0, z0) = (min.x, min.y, min.z);
        let (x1, y1, z1) = (max.x, max.y, max.z);
        self.add_segment([
            Vec3::new(x0, y0, z0),
            Vec3::new(x1, y0, z0),
            Vec3::new(x1, y1, z0),
            Vec3::new(x0, y1, z0),
            Vec3::new(x0, y0, z1),
            Vec3::new(x1, y0, z1),
            Vec3::new(x1, y1, z1),
            Vec3::new(x0, y1, z1),
        ])
    }

    /// Connect `side` of `a` to the opposite side of `b`.
    pub fn connect(&mut self, a: SegId, side: SideId, b: SegId) -> &mut Self {
        self.connect_sides(Tag::new(a, side), Tag::new(b, side.opposite()))
    }

    /// Connect two explicit sides.
    pub fn connect_sides(&mut self, a: Tag, b: Tag) -> &mut Self {
        if let Some(seg) = self.segments.get_mut(a.seg.index()) {
            seg.side_mut(a.side).connection = Some(b.seg);
        }
        if let Some(seg) = self.segments.get_mut(b.seg.index()) {
            seg.side_mut(b.side).connection = Some(a.seg);
        }
        self
    }

    /// Place a wall on `tag` and, if connected, a matching wall on the back side.
    pub fn add_wall(&mut self, tag: Tag, kind: WallKind) -> &mut Self {
        let back = self
            .segments
            .get(tag.seg.index())
            .and_then(|s| s.side(tag.side).connection)
            .and_then(|target| {
                self.segments.get(target.index()).and_then(|other| {
                    other
                        .connections()
                        .find(|&(_, back)| back == tag.seg)
                        .map(|(side, _)| Tag::new(target, side))
                })
            });
        for t in std::iter::once(tag).chain(back) {
            let id = WallId(self.walls.len() as u16);
            self.walls.push(Wall { tag: t, kind });
            if let Some(seg) = self.segments.get_mut(t.seg.index()) {
                seg.side_mut(t.side).wall = Some(id);
            }
        }
        self
    }

    /// Put an overlay texture on a side (and its back side).
    pub fn set_overlay(&mut self, tag: Tag, texture: TexId) -> &mut Self {
        let back = self
            .segments
            .get(tag.seg.index())
            .and_then(|s| s.side(tag.side).connection)
            .map(|target| (target, tag.seg));
        if let Some(seg) = self.segments.get_mut(tag.seg.index()) {
            seg.side_mut(tag.side).tmap2 = Some(texture);
        }
        if let Some((target, from)) = back {
            if let Some(other) = self.segments.get_mut(target.index()) {
                let back_side = other.connections().find(|&(_, b)| b == from).map(|(s, _)| s);
                if let Some(side) = back_side {
                    other.side_mut(side).tmap2 = Some(texture);
                }
            }
        }
        self
    }

    pub fn set_texture(&mut self, tag: Tag, texture: TexId) -> &mut Self {
        if let Some(seg) = self.segments.get_mut(tag.seg.index()) {
            seg.side_mut(tag.side).tmap = texture;
        }
        self
    }

    pub fn set_light_radius(&mut self, tag: Tag, radius: f32) -> &mut Self {
        if let Some(seg) = self.segments.get_mut(tag.seg.index()) {
            seg.side_mut(tag.side).light_radius = Some(radius);
        }
        self
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Validate and produce the level.
    pub fn build(self) -> Result<Level, LevelError> {
        Level::new(self.vertices, self.segments, self.walls, self.textures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Passage;

    #[test]
    fn corridor_is_connected_both_ways() {
        let mut b = LevelBuilder::new();
        let mut prev = b.add_box_segment(Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 10.0, 10.0));
        for i in 1..4 {
            let x = i as f32 * 10.0;
            let seg = b.add_box_segment(Vec3::new(x, 0.0, 0.0), Vec3::new(x + 10.0, 10.0, 10.0));
            b.connect(prev, SideId::Right, seg);
            prev = seg;
        }
        let level = b.build().unwrap();
        assert_eq!(level.segment_count(), 4);
        assert_eq!(level.passage(Tag::new(SegId(1), SideId::Left)), Passage::Open(SegId(0)));
        assert_eq!(level.passage(Tag::new(SegId(1), SideId::Right)), Passage::Open(SegId(2)));
    }

    #[test]
    fn grate_overlay_applies_to_both_sides() {
        let mut b = LevelBuilder::new();
        let grate = b.add_texture(TextureInfo::transparent("grate", None));
        let a = b.add_box_segment(Vec3::ZERO, Vec3::splat(10.0));
        let c = b.add_box_segment(Vec3::new(0.0, 10.0, 0.0), Vec3::new(10.0, 20.0, 10.0));
        b.connect(a, SideId::Top, c);
        b.set_overlay(Tag::new(a, SideId::Top), grate);
        b.add_wall(Tag::new(a, SideId::Top), WallKind::Grate);
        let level = b.build().unwrap();
        let back = Tag::new(c, SideId::Bottom);
        assert_eq!(level.side(back).unwrap().tmap2, Some(grate));
        assert_eq!(level.passage(back), Passage::Transparent(a));
        assert_eq!(level.walls().len(), 2);
    }
}
